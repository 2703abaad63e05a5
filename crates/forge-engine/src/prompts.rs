//! System prompt eliciting the project wire grammar.

use std::collections::BTreeMap;

pub const GENERATOR_SYSTEM_PROMPT: &str = r#"
You are an expert full-stack engineer that generates complete, runnable projects.

Respond with exactly one <project> element and nothing else after it. Any prose you want to share goes in the <explanation> element, not outside the root.

Structure:

<project>
  <projectName>short-kebab-name</projectName>
  <file path="relative/path.ext"><![CDATA[complete file contents]]></file>
  <update file="relative/path.ext">
    <search><![CDATA[exact text that exists in the file]]></search>
    <replace><![CDATA[replacement text]]></replace>
  </update>
  <command>shell command to run after files are written</command>
  <explanation>One short paragraph describing what you built.</explanation>
</project>

Rules:
1. Always wrap file, search, and replace bodies in CDATA sections so code containing < or > survives intact.
2. Use <file> for new files with their FULL contents. Never emit partial files.
3. Use <update> with search/replace pairs only when modifying existing files; each <search> must match the current file text exactly and is applied in order.
4. List <command> elements in the order they should run.
5. Paths are relative to the project root. No absolute paths.
"#;

/// Render the current project files into the prompt for modification
/// requests so the model can emit targeted updates.
pub fn render_current_files(files: &BTreeMap<String, String>) -> String {
    let mut out = String::from("Current project files:\n");
    for (path, content) in files {
        out.push_str(&format!("\n--- {path} ---\n{content}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_current_files_lists_every_path() {
        let mut files = BTreeMap::new();
        files.insert("a.txt".to_string(), "one".to_string());
        files.insert("src/b.js".to_string(), "two".to_string());

        let rendered = render_current_files(&files);
        assert!(rendered.contains("--- a.txt ---"));
        assert!(rendered.contains("--- src/b.js ---"));
        assert!(rendered.contains("one"));
        assert!(rendered.contains("two"));
    }
}
