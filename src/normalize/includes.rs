//! Elision of includes that point inside the module being built.

use super::guards::comment_out;
use super::patterns::{included_file, Included};

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty() && *s != ".").collect()
}

/// Number of equal trailing path segments.
fn common_suffix_len(a: &[&str], b: &[&str]) -> usize {
    a.iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count()
}

/// Comment out includes of files that are part of the module.
///
/// `<a/b.h>` with at least two segments matches when some module path
/// contains it; single-segment angle includes are left alone since they are
/// usually system headers. `"b.h"` matches when its trailing segments agree
/// with some module path. Every line comes back trimmed.
pub fn comment_out_unnecessary_includes<S: AsRef<str>>(
    module_files: &[S],
    lines: Vec<String>,
) -> Vec<String> {
    let module_segments: Vec<Vec<&str>> = module_files
        .iter()
        .map(|path| segments(path.as_ref()))
        .collect();

    lines
        .into_iter()
        .map(|line| {
            let line = line.trim();
            let internal = match included_file(line) {
                Some(Included::System(target)) => {
                    segments(target).len() > 1
                        && module_files.iter().any(|path| path.as_ref().contains(target))
                }
                Some(Included::Local(target)) => {
                    let target = segments(target);
                    module_segments
                        .iter()
                        .any(|path| common_suffix_len(path, &target) >= 1)
                }
                None => false,
            };
            if internal {
                comment_out(line)
            } else {
                line.to_string()
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

    const MODULE: &[&str] = &[
        "CodeCompass/service/workspace/include/workspaceservice/workspaceservice.h",
        "CodeCompass/service/workspace/src/workspaceservice.cpp",
    ];

    #[test]
    fn test_comment_out_unnecessary_includes() {
        let input = lines(&[
            "#include <memory>",
            "\n#include <workspaceservice/workspaceservice.h>\n",
            "\n#include <iostream>",
        ]);
        assert_eq!(
            comment_out_unnecessary_includes(MODULE, input),
            lines(&[
                "#include <memory>",
                "// #include <workspaceservice/workspaceservice.h>",
                "#include <iostream>",
            ])
        );
    }

    #[test]
    fn test_single_segment_angle_include_kept() {
        let input = lines(&["#include <workspaceservice.h>"]);
        assert_eq!(comment_out_unnecessary_includes(MODULE, input.clone()), input);
    }

    #[test]
    fn test_quoted_include_matches_by_suffix() {
        let input = lines(&[
            "#include \"workspaceservice.h\"",
            "#include \"include/workspaceservice/workspaceservice.h\"",
            "#include \"other.h\"",
        ]);
        assert_eq!(
            comment_out_unnecessary_includes(MODULE, input),
            lines(&[
                "// #include \"workspaceservice.h\"",
                "// #include \"include/workspaceservice/workspaceservice.h\"",
                "#include \"other.h\"",
            ])
        );
    }

    #[test]
    fn test_non_include_lines_pass_through() {
        let input = lines(&["// workspaceservice.h", "", "#define X 1", "// #include \"other.h\""]);
        assert_eq!(comment_out_unnecessary_includes(MODULE, input.clone()), input);
    }

    #[test]
    fn test_common_suffix_len() {
        assert_eq!(common_suffix_len(&["a", "b", "c.h"], &["x", "b", "c.h"]), 2);
        assert_eq!(common_suffix_len(&["a", "c.h"], &["d.h"]), 0);
    }
}
