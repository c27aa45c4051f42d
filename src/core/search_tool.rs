/*
 * This module defines the contract with the external search tool (`p4 grep`).
 * It holds the request and result data types, builds the tool's argument vector
 * from a request, derives the match summary from the tool's standard output, and
 * provides the `SearchToolOperations` trait together with `CoreP4GrepTool`, the
 * implementation that launches the real process and captures its decoded streams.
 */
use std::io;
use std::process::Command;

pub const DEFAULT_TOOL_EXECUTABLE: &str = "p4";
pub const DEFAULT_FILE_EXTENSION: &str = "py";

const GREP_SUBCOMMAND: &str = "grep";
const FLAG_CASE_INSENSITIVE: &str = "-i";
const FLAG_LINE_NUMBERS: &str = "-n";
const FLAG_SUPPRESS_NO_MATCH: &str = "-s";
const FLAG_PATTERN: &str = "-e";

/*
 * The validated input of one search: the directory to search under, the pattern
 * (literal text or regular expression) and whether matching is case sensitive.
 * Created at submission time and discarded once the result is rendered.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub directory: String,
    pub pattern: String,
    pub case_sensitive: bool,
}

/// The decoded standard streams of one tool invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

/*
 * The outcome of a successful search: one match per line of standard output,
 * plus the raw output itself for display.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub match_count: usize,
    pub raw_output: String,
}

impl SearchResult {
    pub fn from_stdout(stdout: String) -> Self {
        SearchResult {
            match_count: stdout.lines().count(),
            raw_output: stdout,
        }
    }

    /// The text shown in the output panel: a bold-marked summary line, then the raw output.
    pub fn render(&self) -> String {
        format!("**{} matches found**\n{}", self.match_count, self.raw_output)
    }
}

/*
 * Builds the `grep` arguments for a request, in the tool's expected order:
 * optional case-insensitivity flag, line numbers, "only files with a match",
 * the pattern, and a file spec covering every file with `extension` recursively
 * under `base_name`. The executable and the `grep` subcommand are not included.
 */
pub fn build_grep_arguments(
    request: &SearchRequest,
    base_name: &str,
    extension: &str,
) -> Vec<String> {
    let mut arguments = Vec::with_capacity(6);
    if !request.case_sensitive {
        arguments.push(FLAG_CASE_INSENSITIVE.to_string());
    }
    arguments.push(FLAG_LINE_NUMBERS.to_string());
    arguments.push(FLAG_SUPPRESS_NO_MATCH.to_string());
    arguments.push(FLAG_PATTERN.to_string());
    arguments.push(request.pattern.clone());
    arguments.push(format!("{base_name}\\*\\*.{extension}"));
    arguments
}

#[derive(Debug)]
pub enum SearchToolError {
    // The process could not be started at all (e.g. executable not found).
    Launch(io::Error),
    // The process ran but one of its streams was not valid UTF-8.
    Decode(std::string::FromUtf8Error),
}

impl From<io::Error> for SearchToolError {
    fn from(err: io::Error) -> Self {
        SearchToolError::Launch(err)
    }
}

impl From<std::string::FromUtf8Error> for SearchToolError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        SearchToolError::Decode(err)
    }
}

impl std::fmt::Display for SearchToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchToolError::Launch(e) => write!(f, "Failed to launch search tool: {e}"),
            SearchToolError::Decode(e) => write!(f, "Failed to decode search tool output: {e}"),
        }
    }
}

impl std::error::Error for SearchToolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SearchToolError::Launch(e) => Some(e),
            SearchToolError::Decode(e) => Some(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, SearchToolError>;

/*
 * Runs the external search tool with a prepared argument vector and returns its
 * decoded standard output and standard error. The exit code is not part of the
 * contract; the caller interprets the streams.
 */
pub trait SearchToolOperations: Send + Sync {
    fn run(&self, arguments: &[String]) -> Result<ToolOutput>;
}

/*
 * Launches `<executable> grep <arguments>` synchronously in the current working
 * directory, blocking until the process exits.
 */
pub struct CoreP4GrepTool {
    executable: String,
}

impl CoreP4GrepTool {
    pub fn new(executable: impl Into<String>) -> Self {
        CoreP4GrepTool {
            executable: executable.into(),
        }
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }
}

impl Default for CoreP4GrepTool {
    fn default() -> Self {
        Self::new(DEFAULT_TOOL_EXECUTABLE)
    }
}

impl SearchToolOperations for CoreP4GrepTool {
    fn run(&self, arguments: &[String]) -> Result<ToolOutput> {
        log::debug!(
            "CoreP4GrepTool: Running '{} {} {}'",
            self.executable,
            GREP_SUBCOMMAND,
            arguments.join(" ")
        );
        let output = Command::new(&self.executable)
            .arg(GREP_SUBCOMMAND)
            .args(arguments)
            .output()?;
        log::debug!(
            "CoreP4GrepTool: Process exited with {:?}, {} bytes stdout, {} bytes stderr.",
            output.status.code(),
            output.stdout.len(),
            output.stderr.len()
        );
        Ok(ToolOutput {
            stdout: String::from_utf8(output.stdout)?,
            stderr: String::from_utf8(output.stderr)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(case_sensitive: bool) -> SearchRequest {
        SearchRequest {
            directory: "/repo".to_string(),
            pattern: "TODO".to_string(),
            case_sensitive,
        }
    }

    #[test]
    fn test_arguments_for_case_insensitive_search() {
        let args = build_grep_arguments(&request(false), "repo", "py");
        assert_eq!(args, vec!["-i", "-n", "-s", "-e", "TODO", "repo\\*\\*.py"]);
    }

    #[test]
    fn test_arguments_for_case_sensitive_search_omit_flag() {
        let args = build_grep_arguments(&request(true), "repo", "py");
        assert_eq!(args, vec!["-n", "-s", "-e", "TODO", "repo\\*\\*.py"]);
        assert!(!args.contains(&"-i".to_string()));
    }

    #[test]
    fn test_pattern_is_passed_as_single_argument() {
        let mut req = request(true);
        req.pattern = "fn main() -i".to_string();
        let args = build_grep_arguments(&req, "src", "rs");
        assert_eq!(args[3], "fn main() -i");
        assert_eq!(args.last().map(String::as_str), Some("src\\*\\*.rs"));
        assert!(!args[..3].contains(&"-i".to_string()));
    }

    #[test]
    fn test_match_count_follows_line_count() {
        assert_eq!(SearchResult::from_stdout(String::new()).match_count, 0);
        assert_eq!(SearchResult::from_stdout("one".to_string()).match_count, 1);
        assert_eq!(
            SearchResult::from_stdout("a.py:3:x\nb.py:9:y\n".to_string()).match_count,
            2
        );
        assert_eq!(
            SearchResult::from_stdout("a\r\nb\r\nc".to_string()).match_count,
            3
        );
    }

    #[test]
    fn test_render_matches_expected_layout() {
        let result =
            SearchResult::from_stdout("a.py:3:# TODO fix\nb.py:9:# TODO\n".to_string());
        assert_eq!(
            result.render(),
            "**2 matches found**\na.py:3:# TODO fix\nb.py:9:# TODO\n"
        );
        assert_eq!(
            SearchResult::from_stdout(String::new()).render(),
            "**0 matches found**\n"
        );
    }

    #[test]
    fn test_missing_executable_is_a_launch_error() {
        let tool = CoreP4GrepTool::new("p4search-test-no-such-executable");
        match tool.run(&["-n".to_string()]) {
            Err(SearchToolError::Launch(e)) => assert_eq!(e.kind(), io::ErrorKind::NotFound),
            other => panic!("Expected launch error, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_streams_are_captured_from_process() {
        // `echo` stands in for the tool: it prints the subcommand and arguments back.
        let tool = CoreP4GrepTool::new("echo");
        let output = tool
            .run(&["-n".to_string(), "-e".to_string(), "needle".to_string()])
            .expect("echo should be launchable");
        assert_eq!(output.stdout, "grep -n -e needle\n");
        assert!(output.stderr.is_empty());
    }

    #[test]
    fn test_default_tool_uses_p4() {
        assert_eq!(CoreP4GrepTool::default().executable(), "p4");
    }
}
