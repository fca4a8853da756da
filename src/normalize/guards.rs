//! Include-guard and duplicate-directive elision.

use std::path::Path;

use super::patterns::directive_keyword;
use super::GlobalFragment;

const COMMENT_PREFIX: &str = "// ";

/// Comment out a directive line.
pub fn comment_out(line: &str) -> String {
    format!("{COMMENT_PREFIX}{}", line.trim())
}

pub fn is_commented(line: &str) -> bool {
    line.trim_start().starts_with("//")
}

/// Canonical guard token for a file name: `workspace-service.h` becomes
/// `WORKSPACE_SERVICE`.
pub fn include_guard_token(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default()
        .replace(|c: char| c == '.' || c == '-', "_")
        .to_uppercase()
}

fn is_include(line: &str) -> bool {
    directive_keyword(line) == Some("include")
}

fn opens_block(line: &str) -> bool {
    matches!(directive_keyword(line), Some("if" | "ifdef" | "ifndef"))
}

fn closes_block(line: &str) -> bool {
    directive_keyword(line) == Some("endif")
}

/// Comment out the include guard of `filename` and any directive already
/// emitted into `fragment`.
///
/// An `#endif` stays active only while more live openers than live
/// `#endif`s precede it in this file; otherwise its opener was muted and it
/// is muted too. Commented lines never count.
pub fn comment_out_include_guards(
    filename: &str,
    directives: Vec<String>,
    fragment: &GlobalFragment,
) -> Vec<String> {
    let token = include_guard_token(filename);
    let mut decided: Vec<String> = Vec::with_capacity(directives.len());

    for directive in directives {
        let stripped = directive.trim();
        if is_commented(stripped) {
            decided.push(stripped.to_string());
            continue;
        }

        let mentions_guard = !token.is_empty()
            && !is_include(stripped)
            && stripped.to_uppercase().contains(&token);

        let line = if mentions_guard {
            comment_out(stripped)
        } else if closes_block(stripped) {
            let (opened, closed) = decided
                .iter()
                .filter(|d| !is_commented(d))
                .fold((0usize, 0usize), |(opened, closed), d| {
                    if closes_block(d) {
                        (opened, closed + 1)
                    } else if opens_block(d) {
                        (opened + 1, closed)
                    } else {
                        (opened, closed)
                    }
                });
            if opened > closed {
                stripped.to_string()
            } else {
                comment_out(stripped)
            }
        } else if directive_keyword(stripped) != Some("else") && fragment.contains(stripped) {
            comment_out(stripped)
        } else {
            stripped.to_string()
        };
        decided.push(line);
    }

    decided
}

/// Comment out live `#include` lines already present in `fragment`.
pub fn comment_out_duplicate_includes(
    fragment: &GlobalFragment,
    directives: Vec<String>,
) -> Vec<String> {
    directives
        .into_iter()
        .map(|directive| {
            let stripped = directive.trim();
            if !is_commented(&directive) && is_include(stripped) && fragment.contains(stripped) {
                comment_out(stripped)
            } else {
                directive
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_guard_token() {
        assert_eq!(include_guard_token("workspaceservice.h"), "WORKSPACESERVICE");
        assert_eq!(include_guard_token("my-file.impl.hpp"), "MY_FILE_IMPL");
        assert_eq!(include_guard_token(""), "");
    }

    #[test]
    fn test_comment_out_include_guards() {
        let directives = lines(&[
            "#ifndef CC_SERVICE_WORKSPACE_WORKSPACESERVICE_H\n",
            "#define CC_SERVICE_WORKSPACE_WORKSPACESERVICE_H\n",
            "#ifndef something",
            "#define something",
            "#endif",
            "\n#include <WorkspaceService.h>\n",
            "\n#endif // CC_SERVICE_WORKSPACE_WORKSPACESERVICE_H\n",
        ]);
        let result =
            comment_out_include_guards("workspaceservice.h", directives, &GlobalFragment::new());
        assert_eq!(
            result,
            lines(&[
                "// #ifndef CC_SERVICE_WORKSPACE_WORKSPACESERVICE_H",
                "// #define CC_SERVICE_WORKSPACE_WORKSPACESERVICE_H",
                "#ifndef something",
                "#define something",
                "#endif",
                "#include <WorkspaceService.h>",
                "// #endif // CC_SERVICE_WORKSPACE_WORKSPACESERVICE_H",
            ])
        );
    }

    #[test]
    fn test_bare_endif_follows_muted_guard() {
        let directives = lines(&["#ifndef FOO_H", "#define FOO_H", "#include <vector>", "#endif"]);
        let result = comment_out_include_guards("foo.h", directives, &GlobalFragment::new());
        assert_eq!(
            result,
            lines(&["// #ifndef FOO_H", "// #define FOO_H", "#include <vector>", "// #endif"])
        );
    }

    #[test]
    fn test_unbalanced_endif_is_muted() {
        let result =
            comment_out_include_guards("a.cpp", lines(&["#endif"]), &GlobalFragment::new());
        assert_eq!(result, lines(&["// #endif"]));
    }

    #[test]
    fn test_directive_seen_in_fragment_is_muted() {
        let fragment = GlobalFragment::from_lines(["#ifdef _WIN32", "#define EXPORT", "#else", "#endif"]);
        let directives = lines(&["#ifdef _WIN32", "#define EXPORT", "#else", "#define EXPORT_X", "#endif"]);
        let result = comment_out_include_guards("platform.h", directives, &fragment);
        assert_eq!(
            result,
            lines(&["// #ifdef _WIN32", "// #define EXPORT", "#else", "#define EXPORT_X", "// #endif"])
        );
    }

    #[test]
    fn test_plain_if_opens_block() {
        let directives = lines(&[
            "#if defined(_WIN32)",
            "#define API __declspec(dllexport)",
            "#else",
            "#define API",
            "#endif",
            "#endif",
        ]);
        let result = comment_out_include_guards("platform.h", directives, &GlobalFragment::new());
        assert_eq!(
            result,
            lines(&[
                "#if defined(_WIN32)",
                "#define API __declspec(dllexport)",
                "#else",
                "#define API",
                "#endif",
                "// #endif",
            ])
        );
    }

    #[test]
    fn test_nested_block_inside_guard() {
        let directives = lines(&[
            "#ifndef SHAPES_H",
            "#define SHAPES_H",
            "#include <cmath>",
            "#ifndef PI",
            "#define PI 3.14159",
            "#endif",
            "#endif",
        ]);
        let result = comment_out_include_guards("shapes.h", directives, &GlobalFragment::new());
        assert_eq!(
            result,
            lines(&[
                "// #ifndef SHAPES_H",
                "// #define SHAPES_H",
                "#include <cmath>",
                "#ifndef PI",
                "#define PI 3.14159",
                "#endif",
                "// #endif",
            ])
        );
    }

    #[test]
    fn test_comment_out_duplicate_includes() {
        let fragment = GlobalFragment::from_lines([
            "#include <iostream>",
            "#ifndef something",
            "#define something",
            "#endif",
            "#include <WorkspaceService.h>",
            "#include <vector>",
        ]);
        let directives = lines(&["#include <memory>", "\n#include <workspaceservice.h>\n", "\n#include <iostream>"]);
        let result = comment_out_duplicate_includes(&fragment, directives);
        assert_eq!(
            result,
            lines(&["#include <memory>", "\n#include <workspaceservice.h>\n", "// #include <iostream>"])
        );
    }
}
