// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Core Runtime struct: bootstrap, settings, and privileged operations.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use super::host::{StreamRedirector, Terminator};
use super::paths;
use super::state::{Lifecycle, RuntimeConfig, RuntimeState};
use super::strategies::{
    ConsoleDownloadIndicator, DefaultLaunchHandler, DownloadIndicator, IconSource, LaunchHandler,
    UpdatePolicy, WindowIcon,
};
use super::summary::RuntimeSummary;
use crate::caller::Caller;
use crate::config::{ConfigStore, DeploymentConfig, KEY_BASE_DIR};
use crate::dialog::{Decision, PromptRenderer, PromptRequest, SecurityDialogDispatcher};
use crate::error::RuntimeError;
use crate::messages::{Localizer, CHOOSE_BASE_DIRECTORY, CONFIGURATION_ERROR, NO_BASE_DIRECTORY};
use crate::output_diagnostic::print_console;
use crate::permission::{AuthorizationGate, GateContext, Permission, Setting};
use crate::security::{InstallContext, SecurityInstallation, SecuritySubsystemInstaller};

/// Collaborators assembled by [`RuntimeBuilder`](super::RuntimeBuilder).
pub(crate) struct RuntimeParts {
    pub config_store: Arc<dyn ConfigStore>,
    pub localizer: Localizer,
    pub renderer: Arc<dyn PromptRenderer>,
    pub redirector: Arc<dyn StreamRedirector>,
    pub terminator: Arc<dyn Terminator>,
    pub icon_source: Option<Arc<dyn IconSource>>,
    pub installer: SecuritySubsystemInstaller,
    pub home: Option<PathBuf>,
    pub env_headless: bool,
}

/// Launcher runtime.
///
/// Constructed once at process entry and shared by handle. All getters are
/// safe in any state. Setters take the calling [`Caller`] and go through
/// the [`AuthorizationGate`].
pub struct Runtime {
    state: RuntimeState,
    gate: AuthorizationGate,
    config_store: Arc<dyn ConfigStore>,
    localizer: Localizer,
    renderer: Arc<dyn PromptRenderer>,
    redirector: Arc<dyn StreamRedirector>,
    terminator: Arc<dyn Terminator>,
    icon_source: Option<Arc<dyn IconSource>>,
    installer: SecuritySubsystemInstaller,
    home: Option<PathBuf>,
    env_headless: bool,
    deployment: OnceLock<DeploymentConfig>,
    dialogs: OnceLock<Arc<SecurityDialogDispatcher>>,
    security: OnceLock<SecurityInstallation>,
}

impl Runtime {
    pub(crate) fn new(parts: RuntimeParts) -> Self {
        Self {
            state: RuntimeState::new(RuntimeConfig::default()),
            gate: AuthorizationGate::default(),
            config_store: parts.config_store,
            localizer: parts.localizer,
            renderer: parts.renderer,
            redirector: parts.redirector,
            terminator: parts.terminator,
            icon_source: parts.icon_source,
            installer: parts.installer,
            home: parts.home,
            env_headless: parts.env_headless,
            deployment: OnceLock::new(),
            dialogs: OnceLock::new(),
            security: OnceLock::new(),
        }
    }

    // ---------------------------------------------------------------------
    // Bootstrap
    // ---------------------------------------------------------------------

    /// Initialize the runtime. Runs at most once.
    ///
    /// `is_application` selects full-application mode, where an unreadable
    /// deployment configuration is fatal: the localized configuration error
    /// is printed and the process terminated with status 1.
    ///
    /// Concurrent callers other than the first fail at once with
    /// [`RuntimeError::AlreadyInitialized`].
    pub fn bootstrap(&self, is_application: bool) -> Result<(), RuntimeError> {
        self.state.begin_initialization()?;
        tracing::info!(is_application, "bootstrapping runtime");
        self.state
            .apply_defaults(|config| config.is_application = is_application);

        let deployment = self.load_configuration(is_application)?;
        self.redirect_streams(&deployment);

        if !self.is_headless() && self.env_headless {
            tracing::debug!("headless forced by environment");
            self.state.apply_defaults(|config| config.headless = true);
        }

        let dialogs = Arc::new(
            SecurityDialogDispatcher::start(Arc::clone(&self.renderer))
                .map_err(RuntimeError::DispatcherStart)?,
        );
        let _ = self.dialogs.set(Arc::clone(&dialogs));

        self.apply_default_strategies();
        let base_directory = self.resolve_base_directory(&deployment, &dialogs)?;
        self.state
            .apply_defaults(|config| config.base_directory = Some(base_directory.clone()));

        if self.is_security_enabled() {
            let trust_store = paths::trusted_certificates_path(&base_directory);
            let installation = self.installer.install(InstallContext {
                authority: Arc::clone(self.gate.authority()),
                exit: Arc::clone(self.gate.exit_switch()),
                dialogs,
                config: &deployment,
                localizer: &self.localizer,
                trust_store: Some(trust_store.as_path()),
            })?;
            if let Some(handler) = self.launch_handler() {
                for warning in &installation.warnings {
                    handler.launch_warning(&warning.message);
                }
            }
            let _ = self.security.set(installation);
        } else {
            tracing::warn!("security disabled, skipping security installation");
        }

        let _ = self.deployment.set(deployment);
        self.state.finish_initialization();
        tracing::info!(base_directory = %base_directory.display(), "runtime initialized");
        Ok(())
    }

    fn load_configuration(&self, is_application: bool) -> Result<DeploymentConfig, RuntimeError> {
        match self.config_store.load() {
            Ok(config) => Ok(config),
            Err(e) if is_application => {
                tracing::error!(error = %e, "failed to load deployment configuration");
                if let Some(message) = self.localizer.message(CONFIGURATION_ERROR) {
                    print_console(message);
                }
                self.terminator.terminate(1);
                Err(RuntimeError::FatalConfiguration(e))
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load deployment configuration, using defaults");
                Ok(DeploymentConfig::default())
            }
        }
    }

    fn redirect_streams(&self, deployment: &DeploymentConfig) {
        let redirect = self.state.read(|c| c.redirect_streams);
        let base = self.base_directory();
        let log_dir = paths::log_dir(base.as_deref(), deployment.log_dir());
        if let Err(e) =
            self.redirector
                .redirect(redirect, deployment.logging_enabled(), log_dir.as_deref())
        {
            tracing::warn!(error = %e, "stream redirection failed");
        }
    }

    fn apply_default_strategies(&self) {
        let headless = self.is_headless();
        let icon = match (&self.icon_source, headless) {
            (Some(source), false) if self.window_icon().is_none() => match source.load() {
                Ok(icon) => Some(icon),
                Err(e) => {
                    tracing::warn!(error = %e, "failed to load window icon");
                    None
                }
            },
            _ => None,
        };
        self.state.apply_defaults(|config| {
            if icon.is_some() {
                config.window_icon = icon;
            }
            if !headless && config.download_indicator.is_none() {
                config.download_indicator = Some(Arc::new(ConsoleDownloadIndicator));
            }
            if config.launch_handler.is_none() {
                config.launch_handler = Some(Arc::new(DefaultLaunchHandler));
            }
        });
    }

    /// Base directory: explicit setting, then the `basedir` key, then
    /// `$HOME/.netx` (created and persisted), then a prompt unless headless.
    fn resolve_base_directory(
        &self,
        deployment: &DeploymentConfig,
        dialogs: &SecurityDialogDispatcher,
    ) -> Result<PathBuf, RuntimeError> {
        if let Some(dir) = self.base_directory() {
            return Ok(dir);
        }
        if let Some(dir) = deployment.get_str(KEY_BASE_DIR) {
            return Ok(PathBuf::from(dir));
        }
        if let Some(home) = &self.home {
            let dir = paths::default_base_dir(home);
            match std::fs::create_dir_all(&dir) {
                Ok(()) => {
                    self.persist_base_directory(&dir);
                    return Ok(dir);
                }
                Err(e) => tracing::warn!(dir = %dir.display(), error = %e, "cannot create base directory"),
            }
        }
        if !self.is_headless() {
            let subject = self
                .localizer
                .message(CHOOSE_BASE_DIRECTORY)
                .unwrap_or_default();
            let request = PromptRequest::choose_directory(
                subject,
                self.installer.system(),
                self.home.clone(),
            );
            if let Decision::Directory(dir) = dialogs.submit(request) {
                self.persist_base_directory(&dir);
                return Ok(dir);
            }
        }
        Err(RuntimeError::NoBaseDirectory(
            self.localizer
                .message(NO_BASE_DIRECTORY)
                .unwrap_or_default(),
        ))
    }

    fn persist_base_directory(&self, dir: &Path) {
        if let Err(e) = self
            .config_store
            .persist(KEY_BASE_DIR, &dir.to_string_lossy())
        {
            tracing::warn!(error = %e, "failed to persist base directory");
        }
    }

    // ---------------------------------------------------------------------
    // State
    // ---------------------------------------------------------------------

    pub fn lifecycle(&self) -> Lifecycle {
        self.state.lifecycle()
    }

    pub fn is_initialized(&self) -> bool {
        self.lifecycle() == Lifecycle::Initialized
    }

    /// Fails with `AlreadyInitialized` once bootstrap has begun.
    pub fn check_not_initialized(&self) -> Result<(), RuntimeError> {
        self.state.check_not_initialized()
    }

    /// Snapshot of all settings.
    pub fn settings(&self) -> RuntimeConfig {
        self.state.read(RuntimeConfig::clone)
    }

    pub fn summary(&self) -> RuntimeSummary {
        RuntimeSummary::collect(self)
    }

    // ---------------------------------------------------------------------
    // Getters
    // ---------------------------------------------------------------------

    pub fn base_directory(&self) -> Option<PathBuf> {
        self.state.read(|c| c.base_directory.clone())
    }

    /// Security material directory under the base directory.
    pub fn security_dir(&self) -> Option<PathBuf> {
        self.base_directory().map(|b| paths::security_dir(&b))
    }

    pub fn trusted_certificates_path(&self) -> Option<PathBuf> {
        self.base_directory()
            .map(|b| paths::trusted_certificates_path(&b))
    }

    pub fn update_policy(&self) -> UpdatePolicy {
        self.state.read(|c| c.update_policy)
    }

    pub fn launch_handler(&self) -> Option<Arc<dyn LaunchHandler>> {
        self.state.read(|c| c.launch_handler.clone())
    }

    pub fn download_indicator(&self) -> Option<Arc<dyn DownloadIndicator>> {
        self.state.read(|c| c.download_indicator.clone())
    }

    pub fn window_icon(&self) -> Option<WindowIcon> {
        self.state.read(|c| c.window_icon.clone())
    }

    pub fn is_headless(&self) -> bool {
        self.state.read(|c| c.headless)
    }

    pub fn is_verifying(&self) -> bool {
        self.state.read(|c| c.verify_signatures)
    }

    pub fn is_security_enabled(&self) -> bool {
        self.state.read(|c| c.security_enabled)
    }

    pub fn is_debug(&self) -> bool {
        self.state.read(|c| c.debug)
    }

    pub fn is_redirect_streams(&self) -> bool {
        self.state.read(|c| c.redirect_streams)
    }

    pub fn forks_allowed(&self) -> bool {
        self.state.read(|c| c.forks_allowed)
    }

    pub fn is_application(&self) -> bool {
        self.state.read(|c| c.is_application)
    }

    pub fn initial_arguments(&self) -> Option<Arc<[String]>> {
        self.state.read(|c| c.initial_arguments.clone())
    }

    pub fn exit_authority(&self) -> Option<Caller> {
        self.gate.authority().get()
    }

    pub fn is_exit_disabled(&self) -> bool {
        self.gate.exit_switch().is_disabled()
    }

    /// Deployment configuration loaded by bootstrap.
    pub fn deployment_config(&self) -> Option<&DeploymentConfig> {
        self.deployment.get()
    }

    /// The installed security layer, if security is enabled and bootstrap
    /// got that far.
    pub fn security(&self) -> Option<&SecurityInstallation> {
        self.security.get()
    }

    pub fn localizer(&self) -> &Localizer {
        &self.localizer
    }

    /// Handle to the security dialog worker.
    ///
    /// With security enabled, `caller` needs permission to access security
    /// dialogs from the moment bootstrap starts; while the layer is still
    /// being installed the installer's policy answers. `None` before
    /// bootstrap starts the worker.
    pub fn security_dialogs(
        &self,
        caller: &Caller,
    ) -> Result<Option<Arc<SecurityDialogDispatcher>>, RuntimeError> {
        let permission = Permission::AccessSecurityDialogs;
        match self.security() {
            Some(security) => security.hook.check_permission(caller, &permission)?,
            None if self.is_security_enabled() && self.lifecycle() != Lifecycle::Uninitialized => {
                self.installer.check_pending(caller, &permission)?
            }
            None => {}
        }
        Ok(self.dialogs.get().cloned())
    }

    // ---------------------------------------------------------------------
    // Lifecycle-only setters
    // ---------------------------------------------------------------------

    pub fn set_base_directory(&self, caller: &Caller, dir: PathBuf) -> Result<(), RuntimeError> {
        self.apply(caller, Setting::BaseDirectory, |c| {
            c.base_directory = Some(dir)
        })
    }

    pub fn set_security_enabled(&self, caller: &Caller, enabled: bool) -> Result<(), RuntimeError> {
        self.apply(caller, Setting::SecurityEnabled, |c| {
            c.security_enabled = enabled
        })
    }

    pub fn set_headless(&self, caller: &Caller, headless: bool) -> Result<(), RuntimeError> {
        self.apply(caller, Setting::Headless, |c| c.headless = headless)
    }

    pub fn set_forks_allowed(&self, caller: &Caller, allowed: bool) -> Result<(), RuntimeError> {
        self.apply(caller, Setting::ForksAllowed, |c| c.forks_allowed = allowed)
    }

    pub fn set_redirect_streams(&self, caller: &Caller, redirect: bool) -> Result<(), RuntimeError> {
        self.apply(caller, Setting::RedirectStreams, |c| {
            c.redirect_streams = redirect
        })
    }

    pub fn set_verify_signatures(&self, caller: &Caller, verify: bool) -> Result<(), RuntimeError> {
        self.apply(caller, Setting::VerifySignatures, |c| {
            c.verify_signatures = verify
        })
    }

    // ---------------------------------------------------------------------
    // Ownership-gated setters
    // ---------------------------------------------------------------------

    pub fn set_window_icon(&self, caller: &Caller, icon: WindowIcon) -> Result<(), RuntimeError> {
        self.apply(caller, Setting::WindowIcon, |c| c.window_icon = Some(icon))
    }

    pub fn set_debug(&self, caller: &Caller, debug: bool) -> Result<(), RuntimeError> {
        self.apply(caller, Setting::Debug, |c| c.debug = debug)
    }

    pub fn set_update_policy(
        &self,
        caller: &Caller,
        policy: UpdatePolicy,
    ) -> Result<(), RuntimeError> {
        self.apply(caller, Setting::UpdatePolicy, |c| c.update_policy = policy)
    }

    pub fn set_launch_handler(
        &self,
        caller: &Caller,
        handler: Arc<dyn LaunchHandler>,
    ) -> Result<(), RuntimeError> {
        self.apply(caller, Setting::LaunchHandler, |c| {
            c.launch_handler = Some(handler)
        })
    }

    pub fn set_download_indicator(
        &self,
        caller: &Caller,
        indicator: Arc<dyn DownloadIndicator>,
    ) -> Result<(), RuntimeError> {
        self.apply(caller, Setting::DownloadIndicator, |c| {
            c.download_indicator = Some(indicator)
        })
    }

    /// Make `authority` the exit authority. Once enforcement is active only
    /// the current authority may hand it on.
    pub fn set_exit_authority(&self, caller: &Caller, authority: Caller) -> Result<(), RuntimeError> {
        self.apply(caller, Setting::ExitAuthority, |_| {
            tracing::info!(authority = %authority, "exit authority set");
            self.gate.authority().set(authority)
        })
    }

    /// Replace the initial arguments. With the security layer installed the
    /// caller also needs every permission.
    pub fn set_initial_arguments(
        &self,
        caller: &Caller,
        args: Vec<String>,
    ) -> Result<(), RuntimeError> {
        let args: Arc<[String]> = args.into();
        self.state.update(|lifecycle, config| {
            let ctx = GateContext {
                lifecycle,
                security_enabled: config.security_enabled,
            };
            self.gate.check(caller, Setting::InitialArguments, ctx)?;
            if let Some(security) = self.security() {
                security.hook.check_permission(caller, &Permission::All)?;
            }
            config.initial_arguments = Some(args);
            Ok(())
        })
    }

    // ---------------------------------------------------------------------
    // Exit
    // ---------------------------------------------------------------------

    /// Disable process exit for good. Idempotent.
    pub fn disable_exit(&self) {
        tracing::info!("process exit disabled");
        self.gate.exit_switch().disable();
    }

    /// Terminate the process with `status` on behalf of `caller`.
    ///
    /// Returns only when the configured terminator does.
    pub fn exit(&self, caller: &Caller, status: i32) -> Result<(), RuntimeError> {
        let ctx = self.gate_context();
        self.gate.check_exit(caller, ctx)?;
        tracing::info!(caller = %caller, status, "exit requested");
        self.terminator.terminate(status);
        Ok(())
    }

    fn gate_context(&self) -> GateContext {
        self.state.read_with_lifecycle(|lifecycle, config| GateContext {
            lifecycle,
            security_enabled: config.security_enabled,
        })
    }

    fn apply(
        &self,
        caller: &Caller,
        setting: Setting,
        change: impl FnOnce(&mut RuntimeConfig),
    ) -> Result<(), RuntimeError> {
        self.state.update(|lifecycle, config| {
            let ctx = GateContext {
                lifecycle,
                security_enabled: config.security_enabled,
            };
            self.gate.check(caller, setting, ctx)?;
            change(config);
            Ok(())
        })
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("lifecycle", &self.lifecycle())
            .field("settings", &self.settings())
            .field("exit_authority", &self.exit_authority())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "core_tests.rs"]
mod tests;
