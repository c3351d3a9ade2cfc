// Pipeline orchestration — the per-run bookmark loop.

pub mod run;
