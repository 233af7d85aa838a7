//! Show command implementation
//!
//! Print the artifact of one hook type without installing it.

use bettercommit_core::HookType;
use bettercommit_engine::{ArtifactFinalizer, HookChainCompiler};
use clap::Args;
use std::io::Write;
use std::path::PathBuf;

use crate::command::Command;
use crate::common::{ProjectArgs, RuntimeContext};
use crate::error::{CommandError, Result};

/// Show command
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Hook type to render
    pub hook_type: HookType,

    /// Project selection
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Hooks directory the artifact would be installed in
    #[arg(short, long = "dst-dir", value_name = "DIR", default_value = ".git/hooks")]
    pub dst_dir: PathBuf,

    /// Render without the pager
    #[arg(long)]
    pub no_pager: bool,
}

impl Command for ShowCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        let config = self.project.load_config();
        let spec = config
            .spec_for(self.hook_type)
            .ok_or_else(|| CommandError::NotConfigured {
                hook_type: self.hook_type,
                config: config.path.clone(),
            })?;

        let registry = self.project.registry()?;
        let finalizer = ArtifactFinalizer::new(std::path::absolute(&self.dst_dir)?);
        let compiler = HookChainCompiler::new(&registry, context.render_options(self.no_pager));
        let artifact = compiler.compile(&spec, finalizer.target_path(self.hook_type));

        std::io::stdout().write_all(artifact.raw_text.as_bytes())?;
        Ok(())
    }
}
