//! Rank and world size for distributed runs.

use qrun_hal::DistributedContext;
use tracing::{info, warn};

use crate::config::STDIN;
use crate::error::{DriverError, DriverResult};

/// Source of the rank and size of the current process.
pub trait DistributedRuntime {
    /// Rank and world size, or `None` when the process was not started by a
    /// process manager.
    fn world(&self) -> DriverResult<Option<(usize, usize)>>;
}

/// Rank/size variables exported by common process managers, in lookup order.
const ENV_PAIRS: &[(&str, &str)] = &[
    ("OMPI_COMM_WORLD_RANK", "OMPI_COMM_WORLD_SIZE"),
    ("PMI_RANK", "PMI_SIZE"),
    ("PMIX_RANK", "PMI_SIZE"),
    ("SLURM_PROCID", "SLURM_NTASKS"),
];

/// Reads rank and size from the environment set up by `mpirun`/`srun`.
pub struct EnvRuntime<F = fn(&str) -> Option<String>> {
    lookup: F,
}

impl EnvRuntime {
    /// Read the process environment.
    pub fn new() -> Self {
        Self {
            lookup: |key| std::env::var(key).ok(),
        }
    }
}

impl Default for EnvRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> EnvRuntime<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Read variables through `lookup` instead of the process environment.
    pub fn with_lookup(lookup: F) -> Self {
        Self { lookup }
    }

    fn parse(&self, key: &str, raw: &str) -> DriverResult<usize> {
        raw.trim().parse().map_err(|_| {
            DriverError::Configuration(format!("{key}='{raw}' is not a valid process count"))
        })
    }
}

impl<F> DistributedRuntime for EnvRuntime<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn world(&self) -> DriverResult<Option<(usize, usize)>> {
        for &(rank_key, size_key) in ENV_PAIRS {
            let Some(rank) = (self.lookup)(rank_key) else {
                continue;
            };
            let size = (self.lookup)(size_key).ok_or_else(|| {
                DriverError::Configuration(format!("{rank_key} is set but {size_key} is not"))
            })?;
            return Ok(Some((
                self.parse(rank_key, &rank)?,
                self.parse(size_key, &size)?,
            )));
        }
        Ok(None)
    }
}

/// Standard input cannot be shared between ranks.
pub fn guard_stdin(use_mpi: bool, circuit_filename: &str) -> DriverResult<()> {
    if use_mpi && circuit_filename == STDIN {
        return Err(DriverError::Configuration(
            "reading the circuit from stdin is not supported with --use-mpi; pass a circuit file"
                .into(),
        ));
    }
    Ok(())
}

/// Establish the distributed context of this process.
///
/// Without `use_mpi` this is always a single rank.
pub fn establish(use_mpi: bool, runtime: &dyn DistributedRuntime) -> DriverResult<DistributedContext> {
    if !use_mpi {
        return Ok(DistributedContext::single());
    }

    let Some((rank, size)) = runtime.world()? else {
        warn!("--use-mpi given but no process manager detected; running as a single rank");
        return Ok(DistributedContext::single());
    };

    if size == 0 || rank >= size {
        return Err(DriverError::Configuration(format!(
            "invalid distributed context: rank {rank} of {size}"
        )));
    }

    info!("Running as rank {rank} of {size}");
    Ok(DistributedContext { rank, size })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Fixed(Option<(usize, usize)>);

    impl DistributedRuntime for Fixed {
        fn world(&self) -> DriverResult<Option<(usize, usize)>> {
            Ok(self.0)
        }
    }

    fn env(vars: &[(&str, &str)]) -> EnvRuntime<impl Fn(&str) -> Option<String>> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        EnvRuntime::with_lookup(move |key| map.get(key).cloned())
    }

    #[test]
    fn test_stdin_forbidden_with_mpi() {
        assert!(matches!(
            guard_stdin(true, "stdin"),
            Err(DriverError::Configuration(_))
        ));
        assert!(guard_stdin(true, "circuit.qasm").is_ok());
        assert!(guard_stdin(false, "stdin").is_ok());
    }

    #[test]
    fn test_single_process_without_mpi() {
        let ctx = establish(false, &Fixed(Some((3, 4)))).unwrap();
        assert_eq!(ctx, DistributedContext::single());
    }

    #[test]
    fn test_rank_and_size_from_runtime() {
        let ctx = establish(true, &Fixed(Some((3, 4)))).unwrap();
        assert_eq!(ctx.rank, 3);
        assert_eq!(ctx.size, 4);
        assert!(!ctx.is_reporting_rank());
    }

    #[test]
    fn test_missing_process_manager_is_single_rank() {
        let ctx = establish(true, &Fixed(None)).unwrap();
        assert!(ctx.is_reporting_rank());
        assert_eq!(ctx.size, 1);
    }

    #[test]
    fn test_invalid_rank_rejected() {
        assert!(establish(true, &Fixed(Some((4, 4)))).is_err());
        assert!(establish(true, &Fixed(Some((0, 0)))).is_err());
    }

    #[test]
    fn test_env_runtime_openmpi() {
        let runtime = env(&[("OMPI_COMM_WORLD_RANK", "1"), ("OMPI_COMM_WORLD_SIZE", "2")]);
        assert_eq!(runtime.world().unwrap(), Some((1, 2)));
    }

    #[test]
    fn test_env_runtime_slurm() {
        let runtime = env(&[("SLURM_PROCID", "0"), ("SLURM_NTASKS", "8")]);
        assert_eq!(runtime.world().unwrap(), Some((0, 8)));
    }

    #[test]
    fn test_env_runtime_empty() {
        assert_eq!(env(&[]).world().unwrap(), None);
    }

    #[test]
    fn test_env_runtime_bad_values() {
        assert!(env(&[("PMI_RANK", "x"), ("PMI_SIZE", "2")]).world().is_err());
        assert!(env(&[("PMI_RANK", "0")]).world().is_err());
    }
}
