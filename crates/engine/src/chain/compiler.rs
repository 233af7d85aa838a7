//! Hook chain compiler
//!
//! Translates the ordered sub-hook list of one hook type into the steps of its
//! artifact. Missing sub-hooks are warned about and left out; everything else
//! keeps its configured position.

use super::render::{RenderOptions, render};
use super::{CompiledArtifact, Step};
use crate::registry::{SubHookInvocation, SubHookRegistry};
use bettercommit_config::HookTypeSpec;
use bettercommit_core::UPDATE_TEMPLATE;
use chrono::{DateTime, Local};
use std::path::PathBuf;

/// Compiles hook type specs against a sub-hook registry
///
/// Every call to [`compile`](Self::compile) builds its step list from
/// scratch, so one compiler can be reused across hook types.
pub struct HookChainCompiler<'a, R>
where
    R: SubHookRegistry,
{
    registry: &'a R,
    options: RenderOptions,
}

impl<'a, R> HookChainCompiler<'a, R>
where
    R: SubHookRegistry,
{
    /// Create a compiler resolving sub-hooks through `registry`
    pub fn new(registry: &'a R, options: RenderOptions) -> Self {
        Self { registry, options }
    }

    /// Compile `spec` into an artifact destined for `target_path`
    pub fn compile(&self, spec: &HookTypeSpec, target_path: PathBuf) -> CompiledArtifact {
        self.compile_at(spec, target_path, Local::now())
    }

    /// Compile with an explicit generation timestamp
    #[tracing::instrument(skip(self, spec, target_path), fields(hook_type = %spec.hook_type))]
    pub fn compile_at(
        &self,
        spec: &HookTypeSpec,
        target_path: PathBuf,
        generated_at: DateTime<Local>,
    ) -> CompiledArtifact {
        let mut present: Vec<SubHookInvocation> = Vec::with_capacity(spec.ordered_sub_hooks.len());
        let mut skipped = Vec::new();

        for identifier in &spec.ordered_sub_hooks {
            let invocation = self.registry.resolve(spec.hook_type, identifier);
            if invocation.exists {
                present.push(invocation);
            } else {
                tracing::warn!(
                    "{} does not exist. Ignoring.",
                    invocation.resolved_path.display()
                );
                skipped.push(invocation);
            }
        }

        let rendered_steps = assemble_steps(present);
        tracing::debug!(steps = rendered_steps.len(), skipped = skipped.len(), "Compiled chain");

        let raw_text = render(
            spec.hook_type,
            &target_path,
            &rendered_steps,
            &self.options,
            generated_at,
        );

        CompiledArtifact {
            hook_type: spec.hook_type,
            target_path,
            rendered_steps,
            skipped,
            raw_text,
        }
    }
}

/// Order resolved sub-hooks into a step list
///
/// The shelve step opens right after the first update protocol block, or
/// right after the preamble when the chain has no update sub-hook.
fn assemble_steps(present: Vec<SubHookInvocation>) -> Vec<Step> {
    let has_update = present.iter().any(is_update_template);

    let mut steps = Vec::with_capacity(present.len() + 3);
    steps.push(Step::Preamble);

    let mut shelved = false;
    if !has_update {
        steps.push(Step::Shelve);
        shelved = true;
    }

    for invocation in present {
        if is_update_template(&invocation) {
            steps.push(Step::UpdateProtocol(invocation));
            if !shelved {
                steps.push(Step::Shelve);
                shelved = true;
            }
        } else {
            steps.push(Step::SubHook(invocation));
        }
    }

    steps.push(Step::RestoreEpilogue);
    steps
}

fn is_update_template(invocation: &SubHookInvocation) -> bool {
    invocation.identifier.eq_ignore_ascii_case(UPDATE_TEMPLATE)
}
