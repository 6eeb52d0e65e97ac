//! Build the add-in presentation from source controlled VBA modules.
//!
//! The host application does the heavy lifting: a blank presentation is created, every module
//! is imported into its VBA project, the project references are added and the result is saved
//! as a macro-enabled presentation. The custom ribbon is added to the saved file afterwards by
//! [`crate::rewrite`].

use std::path::{Path, PathBuf};

use crate::consts;
use crate::error::{BuildError, BuildResult};
use crate::host::{BuildSession, HostApplication, Presentation};
use crate::references::{parse_host_version, Platform, ReferencePolicy};
use crate::rewrite::{self, RewriteReport};

#[derive(Debug, Default)]
pub struct AssemblyReport {
    pub imported: Vec<PathBuf>,
    pub attached: Vec<String>,
    pub failed_references: Vec<FailedReference>,
}

#[derive(Debug)]
pub struct FailedReference {
    pub name: String,
    pub path: String,
    pub reason: String,
}

/// The module files in `dir` that should be imported, in name order
pub fn module_files(dir: &Path) -> BuildResult<Vec<PathBuf>> {
    let mut modules = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let wanted = path
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_lowercase)
            .is_some_and(|ext| consts::MODULE_EXTENSIONS.contains(&ext.as_str()));
        if wanted {
            modules.push(path);
        }
    }
    modules.sort();
    Ok(modules)
}

/// The intermediate archive name an earlier build may have left next to the output
pub fn stale_archive_path(output: &Path) -> PathBuf {
    output.with_extension("zip")
}

pub fn assemble<H: HostApplication, P: ReferencePolicy>(
    host: H,
    module_dir: &Path,
    output: &Path,
    policy: &P,
    platform: Platform,
) -> BuildResult<AssemblyReport> {
    // Scan before starting the host, so a bad directory doesn't cost an application launch
    let modules = module_files(module_dir)?;
    let mut report = AssemblyReport::default();

    let mut session = BuildSession::open(host)?;

    for module in modules {
        tracing::info!("importing {}", module.display());
        session
            .presentation()?
            .import_component(&module)
            .map_err(|e| BuildError::ModuleImport(module.clone(), e))?;
        report.imported.push(module);
    }

    let version = parse_host_version(&session.host().version()?)?;
    tracing::info!("resolving references for Office {version}, {platform} Windows");
    for reference in policy.resolve(version, platform) {
        match session.presentation()?.add_reference(&reference.path) {
            Ok(()) => report.attached.push(reference.name),
            Err(e) if reference.required => {
                return Err(BuildError::RequiredReference(reference.name, e));
            }
            Err(e) => {
                tracing::warn!(
                    "failed to add reference to: {} from {}",
                    reference.name,
                    reference.path
                );
                report.failed_references.push(FailedReference {
                    name: reference.name,
                    path: reference.path,
                    reason: e.to_string(),
                });
            }
        }
    }

    // Clean up old files, if any
    remove_stale(output)?;
    remove_stale(&stale_archive_path(output))?;

    session.finish(output)?;
    tracing::info!("saved {}", output.display());
    Ok(report)
}

fn remove_stale(path: &Path) -> BuildResult<()> {
    if path.is_file() {
        std::fs::remove_file(path).map_err(|e| BuildError::Housekeeping(path.to_owned(), e))?;
    }
    Ok(())
}

/// The ribbon xml and the logo it shows
#[derive(Debug, Clone)]
pub struct RibbonAssets {
    pub xml: PathBuf,
    pub logo: PathBuf,
}

#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub module_dir: PathBuf,
    pub output: PathBuf,
    /// Leave as `None` to produce the presentation without a custom ribbon
    pub ribbon: Option<RibbonAssets>,
    /// Defaults to `<stem>_copy.zip` next to the output
    pub scratch: Option<PathBuf>,
    pub platform: Platform,
}

#[derive(Debug)]
pub struct BuildReport {
    pub assembly: AssemblyReport,
    pub ribbon: Option<RewriteReport>,
}

/// Assemble the presentation and then, if ribbon assets are configured, inject the custom UI.
/// Nothing is rewritten unless the assembly succeeded, and a failed rewrite removes the output.
pub fn build<H: HostApplication, P: ReferencePolicy>(
    host: H,
    policy: &P,
    config: &BuildConfig,
) -> BuildResult<BuildReport> {
    let assembly = assemble(
        host,
        &config.module_dir,
        &config.output,
        policy,
        config.platform,
    )?;

    let ribbon = match &config.ribbon {
        Some(assets) => {
            let scratch = match &config.scratch {
                Some(p) => p.clone(),
                None => rewrite::default_scratch_path(&config.output)?,
            };
            match rewrite::rewrite(&config.output, &assets.xml, &assets.logo, &scratch) {
                Ok(report) => Some(report),
                Err(e) => {
                    // A presentation without its ribbon is not a finished add-in
                    if let Err(remove) = std::fs::remove_file(&config.output) {
                        tracing::warn!(
                            "could not remove {} after a failed rewrite: {remove}",
                            config.output.display()
                        );
                    }
                    return Err(e);
                }
            }
        }
        None => None,
    };

    Ok(BuildReport { assembly, ribbon })
}
