// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Runs one calibration session: load, boot, track and tune while the user
//! may override the parameters, then persist and hand off the trajectory.

use anyhow::Result;
use calibra_control::{BootFailurePolicy, Collaborators, Supervisor, SupervisorConfig};
use calibra_core::{BootSequence, SkipBoot, TrajectorySink};
use calibra_infra::{
    BootConfig, CsvFileSink, JsonConfigStore, LogTrajectorySink, SimulatedBootSequence,
    SyntheticGpuProvider, SysinfoCpuProvider,
};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BootPolicyArg {
    /// Log a critical boot failure and keep going.
    Advisory,
    /// Exit before any worker starts.
    Abort,
}

impl From<BootPolicyArg> for BootFailurePolicy {
    fn from(arg: BootPolicyArg) -> Self {
        match arg {
            BootPolicyArg::Advisory => BootFailurePolicy::Advisory,
            BootPolicyArg::Abort => BootFailurePolicy::Abort,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "calibra", version, about = "Aim-assist calibration session")]
struct Args {
    /// Path of the persisted parameter document.
    #[arg(long, default_value = calibra_infra::store::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// How long the tracker records, in seconds.
    #[arg(long, default_value_t = 10)]
    duration: u64,

    /// Reaction to a critical failure in the loading sequence.
    #[arg(long, value_enum, default_value_t = BootPolicyArg::Advisory)]
    boot_policy: BootPolicyArg,

    /// Skip the simulated loading sequence.
    #[arg(long)]
    skip_boot: bool,

    /// Write the recorded trajectory to this CSV file instead of logging a summary.
    #[arg(long)]
    trajectory_csv: Option<PathBuf>,

    /// Seed every random source for a reproducible session.
    #[arg(long)]
    seed: Option<u64>,
}

impl Args {
    fn supervisor_config(&self) -> SupervisorConfig {
        SupervisorConfig {
            run_duration: Duration::from_secs(self.duration),
            boot_policy: self.boot_policy.into(),
            seed: self.seed,
            ..SupervisorConfig::default()
        }
    }

    fn collaborators(&self) -> Collaborators {
        let boot: Box<dyn BootSequence> = match (self.skip_boot, self.seed) {
            (true, _) => Box::new(SkipBoot),
            (false, Some(seed)) => Box::new(SimulatedBootSequence::seeded(
                BootConfig::default(),
                seed.wrapping_add(2),
            )),
            (false, None) => Box::new(SimulatedBootSequence::new(BootConfig::default())),
        };

        let gpu = match self.seed {
            Some(seed) => SyntheticGpuProvider::seeded(seed.wrapping_add(3)),
            None => SyntheticGpuProvider::new(),
        };

        let sink: Box<dyn TrajectorySink> = match &self.trajectory_csv {
            Some(path) => Box::new(CsvFileSink::new(path.clone())),
            None => Box::new(LogTrajectorySink),
        };

        Collaborators {
            store: Box::new(JsonConfigStore::new(self.config.clone())),
            boot,
            cpu: Box::new(SysinfoCpuProvider::new()),
            gpu: Box::new(gpu),
            sink,
        }
    }
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let supervisor = Supervisor::new(args.supervisor_config(), args.collaborators());

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut output = std::io::stdout();
    let report = supervisor.run(&mut input, &mut output)?;

    log::info!(
        "Session finished: {} positions, {} tuner adjustments, {} telemetry samples ({} dropped).",
        report.trajectory.len(),
        report.tuner.cycles,
        report.monitor.cycles,
        report.monitor.dropped
    );
    if !report.failed_workers.is_empty() {
        log::warn!("Workers that did not stop cleanly: {:?}", report.failed_workers);
    }
    log::info!("Final settings: {:?}", report.final_params);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use calibra_control::SupervisorError;
    use calibra_core::BootReport;
    use std::ffi::OsString;
    use std::io::Cursor;

    struct CriticalBoot;

    impl BootSequence for CriticalBoot {
        fn run(&mut self) -> BootReport {
            BootReport {
                critical: Some("Input Profile".to_string()),
                ..BootReport::default()
            }
        }
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["calibra"]).unwrap();
        assert_eq!(args.config, PathBuf::from("aim_assist_config.json"));
        assert_eq!(args.duration, 10);
        assert_eq!(args.boot_policy, BootPolicyArg::Advisory);
        assert!(!args.skip_boot);
        assert!(args.trajectory_csv.is_none());

        let config = args.supervisor_config();
        assert_eq!(config.run_duration, Duration::from_secs(10));
        assert_eq!(config.boot_policy, BootFailurePolicy::Advisory);
    }

    #[test]
    fn test_flags_map_onto_supervisor_config() {
        let args = Args::try_parse_from([
            "calibra",
            "--duration",
            "3",
            "--boot-policy",
            "abort",
            "--seed",
            "42",
            "--skip-boot",
        ])
        .unwrap();

        let config = args.supervisor_config();
        assert_eq!(config.run_duration, Duration::from_secs(3));
        assert_eq!(config.boot_policy, BootFailurePolicy::Abort);
        assert_eq!(config.seed, Some(42));
        assert!(args.skip_boot);
    }

    #[test]
    fn test_unknown_boot_policy_is_rejected() {
        assert!(Args::try_parse_from(["calibra", "--boot-policy", "sometimes"]).is_err());
    }

    #[test]
    fn test_aborted_run_keeps_previous_trajectory_csv() {
        // --- 1. ARRANGE ---
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("trajectory.csv");
        let config = dir.path().join("config.json");
        let previous = "tick,elapsed_ms,x,y\n0,0,1,1\n";
        std::fs::write(&csv, previous).unwrap();

        let argv: Vec<OsString> = vec![
            "calibra".into(),
            "--boot-policy".into(),
            "abort".into(),
            "--config".into(),
            config.clone().into_os_string(),
            "--trajectory-csv".into(),
            csv.clone().into_os_string(),
        ];
        let args = Args::try_parse_from(argv).unwrap();
        let mut parts = args.collaborators();
        parts.boot = Box::new(CriticalBoot);

        // --- 2. ACT ---
        let result = Supervisor::new(args.supervisor_config(), parts)
            .run(&mut Cursor::new("0.1\n0.1\n0.1\n"), &mut Vec::new());

        // --- 3. ASSERT ---
        assert!(matches!(result, Err(SupervisorError::BootAborted(_))));
        assert_eq!(std::fs::read_to_string(&csv).unwrap(), previous);
        assert!(!config.exists());
    }
}
