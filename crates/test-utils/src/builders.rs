#![allow(dead_code)]

use std::collections::BTreeMap;

use watchrun::config::{validate_config, ConfigFile, ConfigSection, TaskConfig, WatchConfig};
use watchrun::types::BusyBehaviour;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: ConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: ConfigFile {
                config: ConfigSection::default(),
                watch: BTreeMap::new(),
                task: BTreeMap::new(),
            },
        }
    }

    pub fn with_watch(mut self, name: &str, watch: WatchConfig) -> Self {
        self.config.watch.insert(name.to_string(), watch);
        self
    }

    pub fn with_task(mut self, name: &str, cmd: &str) -> Self {
        self.config.task.insert(
            name.to_string(),
            TaskConfig {
                cmd: cmd.to_string(),
            },
        );
        self
    }

    pub fn with_debounce_ms(mut self, ms: u64) -> Self {
        self.config.config.debounce_ms = ms;
        self
    }

    pub fn with_behaviour(mut self, behaviour: BusyBehaviour) -> Self {
        self.config.config.triggered_while_running = behaviour;
        self
    }

    pub fn with_queue_length(mut self, len: usize) -> Self {
        self.config.config.queue_length = len;
        self
    }

    pub fn build(self) -> ConfigFile {
        validate_config(&self.config).expect("Failed to build valid config from builder");
        self.config
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `WatchConfig`.
pub struct WatchConfigBuilder {
    watch: WatchConfig,
}

impl WatchConfigBuilder {
    pub fn new() -> Self {
        Self {
            watch: WatchConfig {
                root: None,
                files: vec![],
                exclude: vec![],
                tasks: vec![],
            },
        }
    }

    pub fn root(mut self, root: &str) -> Self {
        self.watch.root = Some(root.to_string());
        self
    }

    pub fn file(mut self, pattern: &str) -> Self {
        self.watch.files.push(pattern.to_string());
        self
    }

    pub fn exclude(mut self, pattern: &str) -> Self {
        self.watch.exclude.push(pattern.to_string());
        self
    }

    pub fn task(mut self, name: &str) -> Self {
        self.watch.tasks.push(name.to_string());
        self
    }

    pub fn build(self) -> WatchConfig {
        self.watch
    }
}

impl Default for WatchConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
