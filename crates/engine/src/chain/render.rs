//! Script rendering
//!
//! Serializes a step list into the bash text installed as the hook. The layout
//! is fixed:
//!
//! 1. interpreter line and generation stamp
//! 2. `set -eo pipefail`
//! 3. `{` body: `exit_error` trap printing the failure banner, stash restore
//!    function and exit trap, then the steps
//! 4. the restore epilogue
//! 5. `} | <pager>;`

use super::Step;
use crate::registry::SubHookInvocation;
use crate::runtime::{NO_UPDATE_EXIT_CODE, REEXEC_ENV, stash_label, update_failed_message};
use bettercommit_core::HookType;
use chrono::{DateTime, Local};
use std::path::Path;

/// Pager the rendered body is piped through by default
pub const DEFAULT_PAGER: &str = "less -iFXR";

const SHEBANG: &str = "#!/usr/bin/env bash";
const SEPARATOR: &str = r#"printf "%0.s-" {1..80} && echo"#;
const COLOR_ANNOUNCE: &str = r"\e[0;37m";
const COLOR_RED: &str = r"\e[1;31m";
const COLOR_END: &str = r"\e[0m";

/// Presentation options baked into the artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Emit ANSI color escapes in operator messages
    pub color: bool,
    /// Command the body output is piped through (`None` = no pager)
    pub pager: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            color: true,
            pager: Some(DEFAULT_PAGER.to_string()),
        }
    }
}

impl RenderOptions {
    /// No colors and no pager
    #[must_use]
    pub fn plain() -> Self {
        Self {
            color: false,
            pager: None,
        }
    }
}

/// Render `steps` into the final script text
pub fn render(
    hook_type: HookType,
    target_path: &Path,
    steps: &[Step],
    options: &RenderOptions,
    generated_at: DateTime<Local>,
) -> String {
    let mut writer = ScriptWriter {
        out: String::with_capacity(2048),
        options,
    };

    for step in steps {
        match step {
            Step::Preamble => writer.preamble(generated_at),
            Step::SubHook(invocation) => {
                writer.announce(invocation);
                let failed = format!("{} failed.", invocation.file_name());
                writer.line(
                    0,
                    format!(
                        "{} \"$@\" || (echo {} && false)",
                        quote_path(&invocation.resolved_path),
                        shell_words::quote(&failed)
                    ),
                );
                writer.line(0, SEPARATOR);
            }
            Step::UpdateProtocol(invocation) => {
                writer.announce(invocation);
                writer.update_protocol(hook_type, invocation, target_path);
                writer.line(0, SEPARATOR);
            }
            Step::Shelve => writer.shelve(),
            Step::RestoreEpilogue => writer.epilogue(),
        }
    }

    writer.out
}

struct ScriptWriter<'a> {
    out: String,
    options: &'a RenderOptions,
}

impl ScriptWriter<'_> {
    fn line(&mut self, indent: usize, text: impl AsRef<str>) {
        for _ in 0..indent {
            self.out.push_str("    ");
        }
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    fn colored(&self, color: &str, text: &str) -> String {
        if self.options.color {
            format!("{color}{text}{COLOR_END}")
        } else {
            text.to_string()
        }
    }

    fn preamble(&mut self, generated_at: DateTime<Local>) {
        self.line(0, SHEBANG);
        self.line(
            0,
            format!(
                "# Auto-generated by bettercommit at {}",
                generated_at.format("%c")
            ),
        );
        self.line(0, "set -eo pipefail");
        self.line(0, "{");
        // ERR trap belongs to the body, never to the outer shell
        let banner = self.colored(COLOR_RED, "Commit has failed. Fix the errors and try again.");
        self.line(0, "exit_error() {");
        self.line(1, format!("echo -e \"{banner}\""));
        self.line(0, "}");
        self.line(0, "trap exit_error ERR");
        self.line(0, "keep_index=0");
        self.line(0, "restore_stash() {");
        self.line(1, "if [[ $keep_index -ne 0 ]]; then");
        self.line(2, "keep_index=0");
        self.line(
            2,
            "git stash pop --index --quiet || echo \"Error: there are conflicts between the stash and the index. Inspect 'git stash list'\"",
        );
        self.line(1, "fi");
        self.line(0, "}");
        self.line(0, "trap restore_stash EXIT");
    }

    fn announce(&mut self, invocation: &SubHookInvocation) {
        let message = self.colored(
            COLOR_ANNOUNCE,
            &format!("Executing {} hook...", invocation.display_name()),
        );
        if self.options.color {
            self.line(0, format!("echo -e {}", shell_words::quote(&message)));
        } else {
            self.line(0, format!("echo {}", shell_words::quote(&message)));
        }
        self.line(0, SEPARATOR);
    }

    fn update_protocol(
        &mut self,
        hook_type: HookType,
        invocation: &SubHookInvocation,
        target: &Path,
    ) {
        self.line(0, "bad_cmd=");
        self.line(
            0,
            format!("{} || bad_cmd=$?", quote_path(&invocation.resolved_path)),
        );
        self.line(
            0,
            format!(
                "if [[ (-n $bad_cmd) && ($# -gt 0) && ($bad_cmd -ne {NO_UPDATE_EXIT_CODE}) && (-z ${{{REEXEC_ENV}:-}}) ]]; then"
            ),
        );
        self.line(1, "# Remote has new changes that were pulled into the template");
        self.line(
            1,
            format!("echo \"Re-executing the {hook_type} with an updated template.\""),
        );
        self.line(1, format!("{REEXEC_ENV}=1 {} 1 || exit $?", quote_path(target)));
        self.line(1, "exit 0");
        self.line(
            0,
            format!("elif [[ (-n $bad_cmd) && ($bad_cmd -ne {NO_UPDATE_EXIT_CODE}) ]]; then"),
        );
        self.line(
            1,
            format!(
                "echo {} && false",
                shell_words::quote(&update_failed_message(hook_type))
            ),
        );
        self.line(
            0,
            format!("elif [[ (-n $bad_cmd) && ($bad_cmd -eq {NO_UPDATE_EXIT_CODE}) ]]; then"),
        );
        self.line(1, "echo 'No new updates to the template. Skipping update.'");
        self.line(0, "fi");
    }

    fn shelve(&mut self) {
        self.line(0, "git diff --quiet > /dev/null 2>&1 || keep_index=1");
        self.line(0, "if [[ $keep_index -eq 1 ]]; then");
        self.line(
            1,
            format!(
                "git stash save --quiet --keep-index \"{}\"",
                stash_label("$(date)")
            ),
        );
        self.line(0, "fi");
    }

    fn epilogue(&mut self) {
        self.line(0, "restore_stash");
        match &self.options.pager {
            Some(pager) => self.line(0, format!("}} | {pager};")),
            None => self.line(0, "}"),
        }
    }
}

fn quote_path(path: &Path) -> String {
    shell_words::quote(&path.to_string_lossy()).into_owned()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use chrono::TimeZone;
    use std::path::PathBuf;

    fn invocation(file: &str, identifier: &str) -> SubHookInvocation {
        SubHookInvocation {
            identifier: identifier.to_string(),
            resolved_path: PathBuf::from("/src/hooks").join(file),
            exists: true,
        }
    }

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2015, 5, 27, 12, 0, 0).unwrap()
    }

    fn render_steps(steps: &[Step], options: &RenderOptions) -> String {
        render(
            HookType::PreCommit,
            Path::new("/repo/.git/hooks/pre-commit"),
            steps,
            options,
            fixed_time(),
        )
    }

    fn full_chain() -> Vec<Step> {
        vec![
            Step::Preamble,
            Step::UpdateProtocol(invocation("pre-commit.UPDATE_TEMPLATE", "update_template")),
            Step::Shelve,
            Step::SubHook(invocation("pre-commit.LINT", "lint")),
            Step::RestoreEpilogue,
        ]
    }

    #[test]
    fn test_preamble_layout() {
        let text = render_steps(&full_chain(), &RenderOptions::default());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "#!/usr/bin/env bash");
        assert!(lines[1].starts_with("# Auto-generated by bettercommit at "));
        assert_eq!(lines[2], "set -eo pipefail");
        assert_eq!(lines[3], "{");
        assert_eq!(lines[4], "exit_error() {");
        assert!(text.contains("}\ntrap exit_error ERR\nkeep_index=0\n"));
    }

    #[test]
    fn test_banner_trap_is_set_inside_piped_body() {
        let text = render_steps(&full_chain(), &RenderOptions::default());

        let body = text.find("\n{\n").unwrap();
        let trap = text.find("trap exit_error ERR").unwrap();
        assert!(body < trap);
        assert_eq!(text.matches("trap exit_error ERR").count(), 1);
    }

    #[test]
    fn test_pager_closes_body() {
        let text = render_steps(&full_chain(), &RenderOptions::default());
        assert!(text.ends_with("restore_stash\n} | less -iFXR;\n"));

        let text = render_steps(&full_chain(), &RenderOptions::plain());
        assert!(text.ends_with("restore_stash\n}\n"));
    }

    #[test]
    fn test_ordinary_call_forwards_arguments() {
        let text = render_steps(&full_chain(), &RenderOptions::plain());
        assert!(text.contains(
            "/src/hooks/pre-commit.LINT \"$@\" || (echo 'pre-commit.LINT failed.' && false)"
        ));
        assert!(text.contains("echo 'Executing LINT hook...'"));
    }

    #[test]
    fn test_update_protocol_ladder() {
        let text = render_steps(&full_chain(), &RenderOptions::plain());

        assert!(text.contains("/src/hooks/pre-commit.UPDATE_TEMPLATE || bad_cmd=$?"));
        assert!(text.contains("Re-executing the pre-commit with an updated template."));
        assert!(text.contains("BETTERCOMMIT_REEXEC=1 /repo/.git/hooks/pre-commit 1 || exit $?"));
        assert!(text.contains("echo 'pre-commit.UPDATE_TEMPLATE failed.' && false"));
        assert!(text.contains("No new updates to the template. Skipping update."));

        let recurse = text.find("Re-executing").unwrap();
        let failed = text.find("UPDATE_TEMPLATE failed.").unwrap();
        let no_update = text.find("No new updates").unwrap();
        assert!(recurse < failed && failed < no_update);
    }

    #[test]
    fn test_shelve_after_update_and_before_calls() {
        let text = render_steps(&full_chain(), &RenderOptions::plain());

        let update = text.find("bad_cmd=$?").unwrap();
        let shelve = text.find("git stash save --quiet --keep-index").unwrap();
        let lint = text.find("pre-commit.LINT \"$@\"").unwrap();
        assert!(update < shelve && shelve < lint);
        assert!(text.contains(
            "\"[bettercommit @ $(date)] saving temporary work for safe hook operation\""
        ));
    }

    #[test]
    fn test_restore_runs_on_exit_and_at_end() {
        let text = render_steps(&full_chain(), &RenderOptions::plain());
        assert!(text.contains("trap restore_stash EXIT"));
        assert!(text.contains("git stash pop --index --quiet || echo"));
        assert!(text.contains("Inspect 'git stash list'"));
    }

    #[test]
    fn test_color_toggle() {
        let colored = render_steps(&full_chain(), &RenderOptions::default());
        assert!(colored.contains(r"\e[1;31mCommit has failed. Fix the errors and try again.\e[0m"));
        assert!(colored.contains(r"echo -e '\e[0;37mExecuting LINT hook...\e[0m'"));

        let plain = render_steps(&full_chain(), &RenderOptions::plain());
        assert!(!plain.contains(r"\e["));
        assert!(plain.contains("Commit has failed. Fix the errors and try again."));
    }

    #[test]
    fn test_paths_with_spaces_are_quoted() {
        let steps = vec![
            Step::Preamble,
            Step::Shelve,
            Step::SubHook(SubHookInvocation {
                identifier: "lint".to_string(),
                resolved_path: PathBuf::from("/my hooks/pre-commit.LINT"),
                exists: true,
            }),
            Step::RestoreEpilogue,
        ];
        let text = render_steps(&steps, &RenderOptions::plain());
        assert!(text.contains("'/my hooks/pre-commit.LINT' \"$@\""));
    }

    #[test]
    fn test_separators_bracket_each_call() {
        let text = render_steps(&full_chain(), &RenderOptions::plain());
        assert_eq!(text.matches(SEPARATOR).count(), 4);
    }
}
