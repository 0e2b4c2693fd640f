use std::path::{Path, PathBuf};

use crate::error::{ServiceError, ServiceResult};
use crate::types::User;

/// systemd refuses unit names longer than this, suffix included.
const UNIT_NAME_MAX: usize = 255;
const UNIT_SUFFIX: &str = ".service";

/// Immutable description of a service.
///
/// Built with the consuming builder methods below and validated by
/// [`ServiceConfig::build`]. Once handed to an adapter it is only ever read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub(crate) name: String,
    pub(crate) display_name: Option<String>,
    pub(crate) description: String,
    pub(crate) arguments: Vec<String>,
    pub(crate) working_directory: Option<PathBuf>,
    pub(crate) chroot: Option<PathBuf>,
    pub(crate) user: Option<User>,
    pub(crate) user_service: bool,
}

impl ServiceConfig {
    /// Creates a configuration for the service called `name`.
    ///
    /// # Defaults
    /// - No arguments, no working directory, no chroot
    /// - Runs as root (no `User=` line)
    /// - System scope (`user_service` is `false`)
    pub fn new(name: &str) -> Self {
        ServiceConfig {
            name: name.to_owned(),
            display_name: None,
            description: String::new(),
            arguments: Vec::new(),
            working_directory: None,
            chroot: None,
            user: None,
            user_service: false,
        }
    }

    // --- Public Getters ---

    /// Returns the service identifier.
    pub fn name(&self) -> &str { &self.name }

    /// Returns the human readable label, falling back to the name.
    pub fn display(&self) -> &str { self.display_name.as_deref().unwrap_or(&self.name) }

    /// Returns the unit description.
    pub fn description_text(&self) -> &str { &self.description }

    /// Returns the arguments passed to the executable, in order.
    pub fn arguments(&self) -> &[String] { &self.arguments }

    /// Returns the configured working directory, if any.
    pub fn working_directory_path(&self) -> Option<&Path> { self.working_directory.as_deref() }

    /// Returns the configured root directory, if any.
    pub fn chroot_path(&self) -> Option<&Path> { self.chroot.as_deref() }

    /// Returns the run-as user, if any.
    pub fn user_name(&self) -> Option<&User> { self.user.as_ref() }

    /// Returns `true` if a per-user service was requested.
    pub fn is_user_service(&self) -> bool { self.user_service }

    /// Returns the systemd unit name, e.g. `ticker.service`.
    pub fn unit_name(&self) -> String { format!("{}{}", self.name, UNIT_SUFFIX) }

    // --- Builder Methods ---

    /// Sets the human readable label. An empty string clears it.
    pub fn display_name(mut self, name: &str) -> Self {
        self.display_name = non_empty(name).map(str::to_owned);
        self
    }

    /// Sets the unit description.
    pub fn description(mut self, text: &str) -> Self { self.description = text.to_owned(); self }

    /// Appends a single argument for the managed executable.
    pub fn arg(mut self, arg: &str) -> Self { self.arguments.push(arg.to_owned()); self }

    /// Appends several arguments, preserving their order.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.arguments.extend(args.into_iter().map(|s| s.as_ref().to_owned()));
        self
    }

    /// Sets the working directory of the service. An empty path clears it.
    pub fn working_directory<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.working_directory = non_empty_path(path.into());
        self
    }

    /// Sets the root directory the service is confined to. An empty path clears it.
    pub fn chroot<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.chroot = non_empty_path(path.into());
        self
    }

    /// Sets the account to run the service as. An empty name clears it.
    pub fn user<U: Into<User>>(mut self, user: U) -> Self {
        let user = user.into();
        self.user = if user.0.is_empty() { None } else { Some(user) };
        self
    }

    /// Requests a per-user service instead of a system one.
    pub fn user_service(mut self, enabled: bool) -> Self { self.user_service = enabled; self }

    /// Validates the configuration.
    /// Checks that the name can be used both as a file name and as a unit name.
    pub fn build(self) -> ServiceResult<Self> {
        validate_name(&self.name)?;
        Ok(self)
    }
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() { None } else { Some(s) }
}

fn non_empty_path(p: PathBuf) -> Option<PathBuf> {
    if p.as_os_str().is_empty() { None } else { Some(p) }
}

fn validate_name(name: &str) -> ServiceResult<()> {
    if name.is_empty() {
        return Err(ServiceError::InvalidConfig("service name is empty".into()));
    }
    if name.len() + UNIT_SUFFIX.len() > UNIT_NAME_MAX {
        return Err(ServiceError::InvalidConfig(format!(
            "service name is longer than {} bytes",
            UNIT_NAME_MAX - UNIT_SUFFIX.len()
        )));
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, ':' | '_' | '.' | '-' | '@')))
    {
        return Err(ServiceError::InvalidConfig(format!(
            "service name '{}' contains invalid character {:?}",
            name, c
        )));
    }
    // systemctl would read the unit name as an option.
    if name.starts_with('-') {
        return Err(ServiceError::InvalidConfig(format!(
            "service name '{}' starts with '-'",
            name
        )));
    }
    // "." and ".." would escape the unit directory.
    if name.chars().all(|c| c == '.') {
        return Err(ServiceError::InvalidConfig(format!("service name '{}' is reserved", name)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_falls_back_to_name() {
        let cfg = ServiceConfig::new("ticker");
        assert_eq!(cfg.display(), "ticker");
        let cfg = cfg.display_name("Ticker Daemon");
        assert_eq!(cfg.display(), "Ticker Daemon");
        let cfg = cfg.display_name("");
        assert_eq!(cfg.display(), "ticker");
    }

    #[test]
    fn empty_optionals_are_unset() {
        let cfg = ServiceConfig::new("ticker").working_directory("").chroot("").user("");
        assert!(cfg.working_directory_path().is_none());
        assert!(cfg.chroot_path().is_none());
        assert!(cfg.user_name().is_none());
    }

    #[test]
    fn arguments_keep_order() {
        let cfg = ServiceConfig::new("ticker").arg("run").args(["-c", "/etc/ticker.toml"]);
        assert_eq!(cfg.arguments(), ["run", "-c", "/etc/ticker.toml"]);
    }

    #[test]
    fn unit_name_has_suffix() {
        assert_eq!(ServiceConfig::new("ticker").unit_name(), "ticker.service");
    }

    #[test]
    fn build_accepts_template_instance_names() {
        assert!(ServiceConfig::new("getty@tty1").build().is_ok());
        assert!(ServiceConfig::new("my_app-2.0").build().is_ok());
        assert!(ServiceConfig::new("app--now").build().is_ok());
    }

    #[test]
    fn build_rejects_bad_names() {
        for name in ["", "has space", "../etc/passwd", "a/b", "..", "ü", "--now", "-x"] {
            let res = ServiceConfig::new(name).build();
            assert!(matches!(res, Err(ServiceError::InvalidConfig(_))), "{:?}", name);
        }
        let long = "x".repeat(UNIT_NAME_MAX);
        assert!(ServiceConfig::new(&long).build().is_err());
    }
}
