//! Derivation of build jobs from the environment and project layout.

use std::fs;
use std::path::Path;

use crate::env_file::{EnvVarTable, env_file_path};
use crate::environment::{BuildEnvironment, BundlingStrategy};
use crate::error::{ConfigError, Result};
use crate::html::HtmlTemplatingRule;
use crate::job::{
    BuildJobDescriptor, CopyStatic, OutputFormat, OutputOptions, OutputTarget, PluginStep,
    WatchPolicy,
};
use crate::layout::ProjectLayout;

/// Turns a [`BuildEnvironment`] and a [`ProjectLayout`] into build jobs.
///
/// # Example
///
/// ```no_run
/// use rigging_config::{BuildEnvironment, ConfigDeriver, ProjectLayout};
///
/// let layout = ProjectLayout::load(".").unwrap();
/// let env = BuildEnvironment::from_process_env().unwrap();
/// let jobs = ConfigDeriver::new(&layout, &env).derive().unwrap();
/// for job in &jobs {
///     println!("{}: {:?}", job.name, job.plugin_names());
/// }
/// ```
pub struct ConfigDeriver<'a> {
    layout: &'a ProjectLayout,
    env: &'a BuildEnvironment,
}

impl<'a> ConfigDeriver<'a> {
    pub fn new(layout: &'a ProjectLayout, env: &'a BuildEnvironment) -> Self {
        Self { layout, env }
    }

    /// Clear the output directory, then compute the jobs.
    ///
    /// # Errors
    ///
    /// Fails before producing any job if the output directory is not inside
    /// the project root, cannot be removed, or the mode environment file is
    /// missing. Nothing is deleted in the first case.
    pub fn derive(&self) -> Result<Vec<BuildJobDescriptor>> {
        let dist = self.layout.checked_dist_dir()?;
        clear_output_dir(&dist)?;
        self.plan()
    }

    /// Compute the jobs without touching the output directory.
    pub fn plan(&self) -> Result<Vec<BuildJobDescriptor>> {
        self.layout.checked_dist_dir()?;
        let env_path = env_file_path(&self.layout.root, &self.env.mode);
        let table = EnvVarTable::load(&env_path)?;
        Ok(self.jobs_from_table(&table))
    }

    /// Compute the jobs from an already loaded substitution table.
    pub fn jobs_from_table(&self, table: &EnvVarTable) -> Vec<BuildJobDescriptor> {
        let mut jobs = vec![self.bundle_job(table)];

        if self.env.bundling == BundlingStrategy::Dynamic {
            jobs.push(self.dynamic_job(table));
        }

        if self.env.should_prerender {
            // Attaches to whichever job is last: the dynamic one when present
            if let Some(last) = jobs.last_mut() {
                last.plugins.push(PluginStep::Prerender {
                    command: self.layout.hooks.prerender.clone(),
                });
            }
        }

        tracing::info!(
            mode = %self.env.mode,
            production = self.env.is_production,
            bundling = %self.env.bundling,
            prerender = self.env.should_prerender,
            jobs = jobs.len(),
            "derived build jobs"
        );
        jobs
    }

    fn bundle_job(&self, table: &EnvVarTable) -> BuildJobDescriptor {
        let target = OutputTarget::File {
            format: OutputFormat::Iife,
            file: self.layout.build_dir().join("bundle.js"),
        };

        let mut extras = Vec::new();
        if !self.env.is_production {
            extras.push(PluginStep::Serve {
                command: self.layout.hooks.serve.clone(),
            });
            extras.push(PluginStep::LiveReload {
                dir: self.layout.dist_dir(),
            });
        }

        self.job(BundlingStrategy::Bundle, true, target, table, extras)
    }

    fn dynamic_job(&self, table: &EnvVarTable) -> BuildJobDescriptor {
        let target = OutputTarget::Dir {
            format: OutputFormat::Esm,
            dir: self.layout.build_dir(),
        };

        let mut extras = Vec::new();
        if !self.env.is_production {
            extras.push(PluginStep::LiveReload {
                dir: self.layout.dist_dir(),
            });
        }

        self.job(BundlingStrategy::Dynamic, false, target, table, extras)
    }

    fn job(
        &self,
        strategy: BundlingStrategy,
        inline_dynamic_imports: bool,
        target: OutputTarget,
        table: &EnvVarTable,
        extras: Vec<PluginStep>,
    ) -> BuildJobDescriptor {
        let options = &self.layout.options;

        let mut plugins = vec![
            PluginStep::Alias {
                find: options.alias.clone(),
                replacement: self.layout.source_dir(),
                extensions: options.extensions.clone(),
            },
            PluginStep::CopyStatic(CopyStatic {
                from: self.layout.static_dir(),
                to: self.layout.dist_dir(),
                template: self.layout.template_path(),
                rename: options.app_html.clone(),
                rule: HtmlTemplatingRule::for_strategy(strategy, self.layout),
                copy_once: true,
                flatten: false,
            }),
            PluginStep::Compile {
                dev: !self.env.is_production,
                hydratable: true,
                css_output: self.layout.build_dir().join("bundle.css"),
                style_prelude: options.style_prelude.clone(),
            },
            PluginStep::Replace {
                values: table.substitutions(),
            },
            PluginStep::Resolve {
                browser: true,
                dedupe: options.dedupe.clone(),
            },
            PluginStep::CommonJs,
        ];

        if self.env.is_production {
            plugins.push(PluginStep::Minify);
        }
        plugins.extend(extras);

        BuildJobDescriptor {
            name: strategy.as_str().to_string(),
            strategy,
            input: self.layout.input(),
            inline_dynamic_imports,
            output: OutputOptions {
                name: options.bundle_name.clone(),
                sourcemap: options.sourcemap,
                target,
            },
            plugins,
            watch: WatchPolicy::default(),
        }
    }
}

/// Remove the output directory and everything in it. An absent directory is
/// not an error.
pub fn clear_output_dir(dir: &Path) -> Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => {
            tracing::debug!(dir = %dir.display(), "cleared output directory");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(ConfigError::ClearOutput {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn env(is_production: bool, bundling: BundlingStrategy, should_prerender: bool) -> BuildEnvironment {
        BuildEnvironment {
            is_production,
            bundling,
            should_prerender,
            mode: "development".to_string(),
        }
    }

    #[test]
    fn plugin_chain_order_in_production() {
        let layout = ProjectLayout::new("/p");
        let env = env(true, BundlingStrategy::Bundle, false);
        let jobs = ConfigDeriver::new(&layout, &env).jobs_from_table(&EnvVarTable::default());

        assert_eq!(jobs.len(), 1);
        assert_eq!(
            jobs[0].plugin_names(),
            vec!["alias", "copy-static", "compile", "replace", "resolve", "common-js", "minify"]
        );
    }

    #[test]
    fn plugin_chain_order_in_development() {
        let layout = ProjectLayout::new("/p");
        let env = env(false, BundlingStrategy::Dynamic, true);
        let jobs = ConfigDeriver::new(&layout, &env).jobs_from_table(&EnvVarTable::default());

        assert_eq!(
            jobs[0].plugin_names(),
            vec!["alias", "copy-static", "compile", "replace", "resolve", "common-js", "serve", "live-reload"]
        );
        assert_eq!(
            jobs[1].plugin_names(),
            vec!["alias", "copy-static", "compile", "replace", "resolve", "common-js", "live-reload", "prerender"]
        );
    }

    #[test]
    fn prerender_attaches_to_single_bundle_when_alone() {
        let layout = ProjectLayout::new("/p");
        let env = env(true, BundlingStrategy::Bundle, true);
        let jobs = ConfigDeriver::new(&layout, &env).jobs_from_table(&EnvVarTable::default());

        assert_eq!(jobs.len(), 1);
        assert!(jobs[0].has_plugin("prerender"));
    }

    #[test]
    fn output_targets_follow_strategy() {
        let layout = ProjectLayout::new("/p");
        let env = env(true, BundlingStrategy::Dynamic, false);
        let jobs = ConfigDeriver::new(&layout, &env).jobs_from_table(&EnvVarTable::default());

        assert!(jobs[0].inline_dynamic_imports);
        assert_eq!(
            jobs[0].output.target,
            OutputTarget::File {
                format: OutputFormat::Iife,
                file: "/p/dist/build/bundle.js".into()
            }
        );
        assert!(!jobs[1].inline_dynamic_imports);
        assert_eq!(
            jobs[1].output.target,
            OutputTarget::Dir {
                format: OutputFormat::Esm,
                dir: "/p/dist/build".into()
            }
        );
        assert_eq!(jobs[1].output.name, "app");
        assert!(jobs[1].output.sourcemap);
        assert!(!jobs[1].watch.clear_screen);
    }

    #[test]
    fn compile_step_tracks_production() {
        let layout = ProjectLayout::new("/p");
        let env = env(false, BundlingStrategy::Bundle, false);
        let jobs = ConfigDeriver::new(&layout, &env).jobs_from_table(&EnvVarTable::default());

        let compile = jobs[0]
            .plugins
            .iter()
            .find(|p| p.name() == "compile")
            .unwrap();
        match compile {
            PluginStep::Compile { dev, css_output, .. } => {
                assert!(*dev);
                assert_eq!(css_output, &std::path::PathBuf::from("/p/dist/build/bundle.css"));
            }
            other => panic!("unexpected step {other:?}"),
        }
    }

    #[test]
    fn clear_output_dir_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let dist = dir.path().join("dist");
        clear_output_dir(&dist).unwrap();

        fs::create_dir_all(dist.join("build")).unwrap();
        fs::write(dist.join("build/stale.js"), "old").unwrap();
        clear_output_dir(&dist).unwrap();
        assert!(!dist.exists());
    }

    fn project_with_dist(dist: &str) -> (TempDir, ProjectLayout) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("app");
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/main.js"), "export {};").unwrap();
        fs::write(root.join(".env.development"), "").unwrap();
        fs::write(dir.path().join("sibling.txt"), "keep").unwrap();

        let mut layout = ProjectLayout::new(&root);
        layout.options.dist_dir = dist.into();
        (dir, layout)
    }

    #[test]
    fn derive_refuses_to_clear_project_root() {
        let (dir, layout) = project_with_dist(".");
        let env = env(true, BundlingStrategy::Bundle, false);

        let err = ConfigDeriver::new(&layout, &env).derive().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        assert!(dir.path().join("app/src/main.js").exists());
    }

    #[test]
    fn derive_refuses_to_clear_parent_dir() {
        let (dir, layout) = project_with_dist("..");
        let env = env(true, BundlingStrategy::Bundle, false);

        let err = ConfigDeriver::new(&layout, &env).derive().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        assert!(dir.path().join("sibling.txt").exists());
        assert!(dir.path().join("app/src/main.js").exists());
    }

    #[test]
    fn plan_rejects_output_outside_root() {
        let (dir, layout) = project_with_dist("../out");
        let env = env(true, BundlingStrategy::Bundle, false);

        assert!(ConfigDeriver::new(&layout, &env).plan().is_err());
        assert!(dir.path().join("sibling.txt").exists());
    }

    #[test]
    fn derive_clears_nested_output() {
        let (dir, layout) = project_with_dist("public/site");
        let stale = dir.path().join("app/public/site/old.js");
        fs::create_dir_all(stale.parent().unwrap()).unwrap();
        fs::write(&stale, "old").unwrap();
        let env = env(true, BundlingStrategy::Bundle, false);

        ConfigDeriver::new(&layout, &env).derive().unwrap();
        assert!(!stale.exists());
        assert!(dir.path().join("app/public").exists());
    }

    #[test]
    fn plan_requires_env_file() {
        let dir = TempDir::new().unwrap();
        let layout = ProjectLayout::new(dir.path());
        let env = env(true, BundlingStrategy::Dynamic, true);

        let err = ConfigDeriver::new(&layout, &env).plan().unwrap_err();
        assert!(matches!(err, ConfigError::EnvFileNotFound(_)));
    }
}
