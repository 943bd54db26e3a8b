use serde::Serialize;
use sysinfo::{CpuExt, PidExt, ProcessExt, SystemExt};

/// Host and process resource usage sampled by the telemetry runtime.
pub(crate) struct System {
    inner: sysinfo::System,
    pid: Option<sysinfo::Pid>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SystemMetrics {
    pub total_memory_bytes: u64,
    pub used_memory_bytes: u64,
    pub global_cpu_usage_percent: f32,
    pub process_memory_bytes: u64,
    pub process_cpu_usage_percent: f32,
}

impl System {
    pub(crate) async fn new() -> Self {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => Some(pid),
            Err(e) => {
                tracing::warn!("could not resolve current pid: {}", e);
                None
            }
        };

        let mut system = Self {
            inner: sysinfo::System::new(),
            pid,
        };
        system.refresh();
        system
    }

    pub(crate) fn refresh(&mut self) {
        self.inner.refresh_memory();
        self.inner.refresh_cpu();
        if let Some(pid) = self.pid {
            self.inner.refresh_process(pid);
        }
    }

    pub(crate) fn metrics(&self) -> anyhow::Result<SystemMetrics> {
        let pid = self
            .pid
            .ok_or_else(|| anyhow::anyhow!("current pid is unknown"))?;
        let process = self.inner.process(pid).ok_or_else(|| {
            anyhow::anyhow!("process {} not found", pid.as_u32())
        })?;

        Ok(SystemMetrics {
            total_memory_bytes: self.inner.total_memory(),
            used_memory_bytes: self.inner.used_memory(),
            global_cpu_usage_percent: self.inner.global_cpu_info().cpu_usage(),
            process_memory_bytes: process.memory(),
            process_cpu_usage_percent: process.cpu_usage(),
        })
    }
}

/// Serializable view of [`SystemMetrics`] for `serde_prometheus`.
#[derive(Debug, Serialize)]
pub(crate) struct SystemMetricsWrapper {
    system_total_memory_bytes: u64,
    system_used_memory_bytes: u64,
    system_cpu_usage_percent: f64,
    process_memory_bytes: u64,
    process_cpu_usage_percent: f64,
}

impl From<SystemMetrics> for SystemMetricsWrapper {
    fn from(m: SystemMetrics) -> Self {
        Self {
            system_total_memory_bytes: m.total_memory_bytes,
            system_used_memory_bytes: m.used_memory_bytes,
            system_cpu_usage_percent: f64::from(m.global_cpu_usage_percent),
            process_memory_bytes: m.process_memory_bytes,
            process_cpu_usage_percent: f64::from(m.process_cpu_usage_percent),
        }
    }
}
