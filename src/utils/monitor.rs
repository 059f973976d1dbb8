#[cfg(feature = "cli")]
use std::sync::atomic::{AtomicU64, Ordering};
#[cfg(feature = "cli")]
use std::sync::Mutex;
#[cfg(feature = "cli")]
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy)]
pub struct SystemStats {
    pub cpu_usage: f32,
    pub memory_usage_mb: u64,
    pub peak_memory_mb: u64,
    pub elapsed_time: Duration,
}

/// Samples CPU and memory of this process between stages.
#[cfg(feature = "cli")]
pub struct SystemMonitor {
    probe: Option<(Pid, Mutex<System>)>,
    started: Instant,
    peak_memory_mb: AtomicU64,
}

#[cfg(feature = "cli")]
impl SystemMonitor {
    pub fn new(enabled: bool) -> Self {
        let probe = if enabled {
            match sysinfo::get_current_pid() {
                Ok(pid) => Some((pid, Mutex::new(System::new()))),
                Err(e) => {
                    tracing::warn!("Process monitoring unavailable: {}", e);
                    None
                }
            }
        } else {
            None
        };

        Self {
            probe,
            started: Instant::now(),
            peak_memory_mb: AtomicU64::new(0),
        }
    }

    pub fn get_stats(&self) -> Option<SystemStats> {
        let (pid, system) = self.probe.as_ref()?;
        let mut system = system.lock().ok()?;
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[*pid]),
            true,
            ProcessRefreshKind::everything(),
        );

        let process = system.process(*pid)?;
        let memory_usage_mb = process.memory() / (1024 * 1024);
        let peak_memory_mb = self
            .peak_memory_mb
            .fetch_max(memory_usage_mb, Ordering::Relaxed)
            .max(memory_usage_mb);

        Some(SystemStats {
            cpu_usage: process.cpu_usage(),
            memory_usage_mb,
            peak_memory_mb,
            elapsed_time: self.started.elapsed(),
        })
    }

    pub fn log_stats(&self, phase: &str) {
        let Some(stats) = self.get_stats() else {
            return;
        };
        tracing::info!(
            "📊 {} - CPU: {:.1}%, Memory: {}MB, Peak: {}MB, Time: {:?}",
            phase,
            stats.cpu_usage,
            stats.memory_usage_mb,
            stats.peak_memory_mb,
            stats.elapsed_time
        );
    }

    pub fn log_final_stats(&self) {
        if let Some(stats) = self.get_stats() {
            tracing::info!(
                "📊 Run finished in {:?}, peak memory {}MB",
                stats.elapsed_time,
                stats.peak_memory_mb
            );
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.probe.is_some()
    }
}

#[cfg(feature = "cli")]
impl Default for SystemMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

// No-op stand-in when built without the cli feature
#[cfg(not(feature = "cli"))]
#[derive(Default)]
pub struct SystemMonitor;

#[cfg(not(feature = "cli"))]
impl SystemMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn log_stats(&self, _phase: &str) {}

    pub fn log_final_stats(&self) {}

    pub fn is_enabled(&self) -> bool {
        false
    }
}
