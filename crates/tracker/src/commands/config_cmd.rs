//! Config subcommand handlers.

use std::collections::HashMap;
use std::fmt::Write;

use dialoguer::Input;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Defaults, Profile};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config as TOML-like text, profiles sorted by name.
fn format_config(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    let _ = writeln!(out, "page_size = {}", cfg.defaults.page_size);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "api_url = \"{}\"", p.api_url);
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
        if let Some(page_size) = p.page_size {
            let _ = writeln!(out, "page_size = {page_size}");
        }
    }

    out.trim_end().to_owned()
}

fn profile_list(cfg: &Config) -> String {
    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    names
        .into_iter()
        .map(|name| {
            let marker = if cfg.default_profile.as_deref() == Some(name.as_str()) {
                "*"
            } else {
                " "
            };
            format!("{marker} {name}  {}", cfg.profiles[name].api_url)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            util::ensure_terminal("config init")?;
            let config_path = config::config_path();
            eprintln!("Issue tracker CLI configuration");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(CliError::prompt)?;

            let api_url: String = Input::new()
                .with_prompt("API base URL")
                .default(tracker_core::DEFAULT_API_URL.into())
                .validate_with(|raw: &String| {
                    tracker_config::parse_api_url(raw)
                        .map(|_| ())
                        .map_err(|e| e.to_string())
                })
                .interact_text()
                .map_err(CliError::prompt)?;

            let page_size: u32 = Input::new()
                .with_prompt("Issues per page")
                .default(tracker_core::DEFAULT_PAGE_SIZE)
                .validate_with(|n: &u32| {
                    if *n >= 1 {
                        Ok(())
                    } else {
                        Err("must be at least 1")
                    }
                })
                .interact_text()
                .map_err(CliError::prompt)?;

            let mut profile = Profile::for_url(api_url);
            if page_size != tracker_core::DEFAULT_PAGE_SIZE {
                profile.page_size = Some(page_size);
            }

            let mut cfg = config::load_config_or_default();
            if cfg.profiles.contains_key(&profile_name)
                && !util::confirm(
                    &format!("Profile '{profile_name}' exists. Overwrite?"),
                    global.yes,
                )?
            {
                return Ok(());
            }
            if cfg.profiles.is_empty() {
                cfg = Config {
                    default_profile: Some(profile_name.clone()),
                    defaults: Defaults::default(),
                    profiles: HashMap::new(),
                };
            }
            cfg.profiles.insert(profile_name.clone(), profile);

            let written = config::save_config(&cfg)?;
            eprintln!("\nConfiguration written to {}", written.display());
            eprintln!("  Profile: {profile_name}");
            eprintln!("\n  Test it: tracker health -p {profile_name}");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = output::render_single(global.output, &cfg, format_config, |_| {
                "config".into()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            if cfg.profiles.is_empty() {
                if !global.quiet {
                    eprintln!("No profiles configured. Create one with: tracker config init");
                }
                return Ok(());
            }
            output::print_output(&profile_list(&cfg), global.quiet);
            Ok(())
        }

        // ── Use <name> ──────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name,
                });
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Default profile set to '{name}'");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Config {
        let mut cfg = Config::default();
        cfg.profiles
            .insert("default".into(), Profile::for_url("http://localhost:8000"));
        let mut remote = Profile::for_url("https://issues.example.com");
        remote.timeout = Some(5);
        cfg.profiles.insert("remote".into(), remote);
        cfg
    }

    #[test]
    fn format_lists_profiles_in_order() {
        let text = format_config(&sample());
        let default_at = text.find("[profiles.default]");
        let remote_at = text.find("[profiles.remote]");
        assert!(default_at.is_some() && remote_at.is_some());
        assert!(default_at < remote_at);
        assert!(text.contains("timeout = 5"));
        assert!(text.contains("page_size = 10"));
    }

    #[test]
    fn profile_list_marks_default() {
        let list = profile_list(&sample());
        assert_eq!(
            list,
            "* default  http://localhost:8000\n  remote  https://issues.example.com"
        );
    }
}
