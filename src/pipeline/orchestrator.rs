// 全ジョブ実行

use tracing::warn;

use crate::pipeline::CancelToken;
use crate::pipeline::job_runner::{JobConfig, JobResult, run_job};

/// Run multiple jobs, collecting results.
/// One job failure does NOT prevent other jobs from running.
///
/// `parallel_workers > 0` runs page processing on a dedicated rayon pool of
/// that size; `0` uses the global pool.
pub fn run_all_jobs(
    jobs: &[JobConfig],
    parallel_workers: usize,
    cancel: &CancelToken,
) -> Vec<crate::error::Result<JobResult>> {
    let run = || -> Vec<crate::error::Result<JobResult>> {
        jobs.iter().map(|job| run_job(job, cancel)).collect()
    };

    if parallel_workers == 0 {
        return run();
    }

    match rayon::ThreadPoolBuilder::new()
        .num_threads(parallel_workers)
        .build()
    {
        Ok(pool) => pool.install(run),
        Err(e) => {
            warn!(error = %e, "failed to build worker pool, using the global pool");
            run()
        }
    }
}
