//! Module assembler: merges an ordered file set into one module unit.
//!
//! Output layout:
//!
//! ```text
//! module;
//!
//! // a.h
//! <a.h directives, muted ones commented out>
//!
//! export module <name>;
//!
//! // a.h
//! <a.h body, first namespace exported>
//! ```

use tracing::info;

use crate::error::{ModularizerError, Result};
use crate::graph::is_header;
use crate::normalize::patterns::{collapse_blank_runs, export_first_namespace};
use crate::normalize::{comment_out_unnecessary_includes, normalize, GlobalFragment};
use crate::source::SourceFile;

/// A merged module, never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedModule {
    name: String,
    global_fragment: Vec<String>,
    /// Paths in emission order.
    files: Vec<String>,
    text: String,
}

impl SynthesizedModule {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directive scaffolding emitted before `export module`.
    pub fn global_fragment(&self) -> &[String] {
        &self.global_fragment
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}


/// A module name must be an identifier once `.` and `:` are removed.
pub fn validate_module_name(name: &str) -> Result<()> {
    let bare: String = name.chars().filter(|c| *c != '.' && *c != ':').collect();
    let mut chars = bare.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c == '_' || c.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric());
    if valid {
        Ok(())
    } else {
        Err(ModularizerError::InvalidModuleName(name.to_string()))
    }
}

/// Merge `files` (in merge order) into the module `module_name`.
///
/// Headers are emitted before sources; each group keeps its input order.
pub fn assemble(files: &[SourceFile], module_name: &str) -> Result<SynthesizedModule> {
    if files.is_empty() {
        return Err(ModularizerError::EmptyModule(module_name.to_string()));
    }
    validate_module_name(module_name)?;

    let (headers, sources): (Vec<&SourceFile>, Vec<&SourceFile>) =
        files.iter().partition(|f| is_header(&f.filename));

    let mut fragment = GlobalFragment::new();
    let mut body: Vec<String> = Vec::new();
    let mut emitted = Vec::with_capacity(files.len());

    for file in headers.iter().chain(sources.iter()) {
        let marker = format!("// {}", file.filename);

        fragment.push(marker.clone());
        let normalized = normalize(file, fragment);
        fragment = normalized.fragment;
        fragment.push("");

        let text = if is_header(&file.filename) {
            export_first_namespace(&normalized.body)
        } else {
            normalized.body
        };
        body.push(marker);
        body.extend(text.lines().map(str::to_string));
        body.push(String::new());

        emitted.push(file.path.clone());
    }

    let module_paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
    let global_fragment = comment_out_unnecessary_includes(&module_paths, fragment.into_lines());

    let export = format!("export module {module_name};");
    let mut lines: Vec<&str> = vec!["module;", ""];
    lines.extend(global_fragment.iter().map(String::as_str));
    lines.extend(["", export.as_str(), ""]);
    lines.extend(body.iter().map(String::as_str));

    let mut text = collapse_blank_runs(&lines.join("\n"));
    text.truncate(text.trim_end().len());
    text.push('\n');

    info!(
        module = module_name,
        headers = headers.len(),
        sources = sources.len(),
        bytes = text.len(),
        "module assembled"
    );

    Ok(SynthesizedModule {
        name: module_name.to_string(),
        global_fragment,
        files: emitted,
        text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn file(id: i64, path: &str, content: &str) -> SourceFile {
        SourceFile {
            id,
            path: path.to_string(),
            filename: Path::new(path)
                .file_name()
                .unwrap()
                .to_string_lossy()
                .to_string(),
            content: content.to_string(),
        }
    }

    const HEADER: &str = "#ifndef CC_SERVICE_WORKSPACESERVICE_H
#define CC_SERVICE_WORKSPACESERVICE_H

#include <memory>
#include <string>

namespace cc
{
namespace service
{
class WorkspaceServiceHandler
{
public:
  std::string name() const;
};
} // service
} // cc

#endif // CC_SERVICE_WORKSPACESERVICE_H
";

    const SOURCE: &str = "#include <workspaceservice/workspaceservice.h>
#include <memory>
#include <iostream>

namespace cc
{
namespace service
{
// Returns the handler name.
std::string WorkspaceServiceHandler::name() const
{
  return \"workspace\";
}
} // service
} // cc
";

    fn module_files() -> Vec<SourceFile> {
        vec![
            file(
                1,
                "/cc/service/workspace/src/workspaceservice.cpp",
                SOURCE,
            ),
            file(
                2,
                "/cc/service/workspace/include/workspaceservice/workspaceservice.h",
                HEADER,
            ),
        ]
    }

    #[test]
    fn test_validate_module_name() {
        assert!(validate_module_name("workspace").is_ok());
        assert!(validate_module_name("cc.service:workspace").is_ok());
        assert!(validate_module_name("_ws2").is_ok());
        assert!(validate_module_name("2ws").is_err());
        assert!(validate_module_name("work space").is_err());
        assert!(validate_module_name("").is_err());
        assert!(validate_module_name("a-b").is_err());
    }

    #[test]
    fn test_empty_module() {
        let err = assemble(&[], "workspace").unwrap_err();
        assert!(matches!(err, ModularizerError::EmptyModule(_)));
    }

    #[test]
    fn test_invalid_name() {
        let err = assemble(&module_files(), "1workspace").unwrap_err();
        assert!(matches!(err, ModularizerError::InvalidModuleName(_)));
    }

    #[test]
    fn test_headers_precede_sources() {
        let module = assemble(&module_files(), "workspace").unwrap();
        assert_eq!(
            module.files(),
            &[
                "/cc/service/workspace/include/workspaceservice/workspaceservice.h",
                "/cc/service/workspace/src/workspaceservice.cpp",
            ]
        );
        let text = module.text();
        let header_at = text.find("class WorkspaceServiceHandler").unwrap();
        let source_at = text.find("WorkspaceServiceHandler::name").unwrap();
        assert!(header_at < source_at);
    }

    #[test]
    fn test_global_fragment() {
        let module = assemble(&module_files(), "workspace").unwrap();
        assert_eq!(
            module.global_fragment(),
            &[
                "// workspaceservice.h",
                "// #ifndef CC_SERVICE_WORKSPACESERVICE_H",
                "// #define CC_SERVICE_WORKSPACESERVICE_H",
                "#include <memory>",
                "#include <string>",
                "// #endif",
                "",
                "// workspaceservice.cpp",
                "// #include <workspaceservice/workspaceservice.h>",
                "// #include <memory>",
                "#include <iostream>",
                "",
            ]
        );
    }

    #[test]
    fn test_rendered_text() {
        let module = assemble(&module_files(), "workspace").unwrap();
        let text = module.text();

        assert!(text.starts_with("module;\n\n// workspaceservice.h\n"));
        assert!(text.contains("\nexport module workspace;\n\n// workspaceservice.h\n"));
        assert!(text.ends_with("}\n"));
        assert!(!text.contains("\n\n\n"));
        assert!(!text.contains("Returns the handler name"));

        // only the header's first namespace is exported
        assert_eq!(text.matches("export namespace").count(), 1);
        let exported = text.find("export namespace cc").unwrap();
        assert!(exported > text.find("export module").unwrap());
    }

    #[test]
    fn test_deterministic() {
        let first = assemble(&module_files(), "workspace").unwrap();
        let second = assemble(&module_files(), "workspace").unwrap();
        assert_eq!(first.text(), second.text());
    }
}
