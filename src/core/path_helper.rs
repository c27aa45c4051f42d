/*
 * This module provides `PathHelper`, a small convenience layer over the standard
 * path and file primitives. It validates path strings, manipulates them
 * (join, parent, base name, extension), performs file and directory operations,
 * and manages whole-file content. Every operation rejects empty arguments before
 * touching the file system, and every OS failure is collapsed into the fixed
 * `PathHelperError` taxonomy; the source `io::Error` is not carried along.
 *
 * It also defines `WorkingDirectoryOperations`, the narrow slice of the helper the
 * search presenter depends on, so the presenter can be exercised with a mock.
 */
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

// Serializes changes of the process-wide working directory.
static WORKING_DIRECTORY_LOCK: Mutex<()> = Mutex::new(());

/*
 * The error taxonomy for all `PathHelper` operations. Each variant renders a fixed
 * message; `InvalidParameter` names the operation that rejected its arguments.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathHelperError {
    NotFound,
    AlreadyExists,
    PermissionDenied,
    Os,
    Decode,
    InvalidParameter(&'static str),
}

impl From<io::Error> for PathHelperError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => PathHelperError::NotFound,
            io::ErrorKind::AlreadyExists => PathHelperError::AlreadyExists,
            io::ErrorKind::PermissionDenied => PathHelperError::PermissionDenied,
            io::ErrorKind::InvalidData => PathHelperError::Decode,
            _ => PathHelperError::Os,
        }
    }
}

impl std::fmt::Display for PathHelperError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathHelperError::NotFound => write!(f, "No such file or directory"),
            PathHelperError::AlreadyExists => write!(f, "File already exists"),
            PathHelperError::PermissionDenied => write!(f, "Insufficient file permissions"),
            PathHelperError::Os => write!(f, "OS error during file operation"),
            PathHelperError::Decode => write!(f, "Unable to read file content"),
            PathHelperError::InvalidParameter(operation) => {
                write!(f, "Unable to {operation}: invalid parameter")
            }
        }
    }
}

impl std::error::Error for PathHelperError {}

pub type Result<T> = std::result::Result<T, PathHelperError>;

/*
 * The operations the search presenter needs from the file system: checking the
 * requested directory, deriving its base name for the file glob, and switching the
 * process working directory before the external tool runs.
 */
pub trait WorkingDirectoryOperations: Send + Sync {
    fn is_directory(&self, path: &str) -> Result<bool>;
    fn get_base_name(&self, path: &str) -> Result<String>;
    fn change_directory(&self, path: &str) -> Result<()>;
    fn get_current_directory(&self) -> Result<PathBuf>;
}

fn require_non_empty(value: &str, operation: &'static str) -> Result<()> {
    if value.is_empty() {
        log::warn!("PathHelper: Rejected empty argument for '{operation}'.");
        return Err(PathHelperError::InvalidParameter(operation));
    }
    Ok(())
}

fn to_display_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/*
 * Path management and file operations for common file-related tasks.
 * Operations take an optional path; `None` falls back to the helper's default path,
 * which is the working directory at construction time unless replaced via `set_path`.
 */
#[derive(Debug, Clone)]
pub struct PathHelper {
    path: String,
}

impl PathHelper {
    /*
     * Creates a helper whose default path is the current working directory.
     * Fails only if the working directory cannot be determined.
     */
    pub fn new() -> Result<Self> {
        let current = std::env::current_dir()?;
        Ok(PathHelper {
            path: to_display_string(&current),
        })
    }

    /*
     * Creates a helper with an explicit default path. The path must pass
     * `is_valid_path`, otherwise `InvalidParameter` is returned.
     */
    pub fn with_path(path: &str) -> Result<Self> {
        let mut helper = PathHelper {
            path: String::new(),
        };
        helper.set_path(path)?;
        Ok(helper)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn set_path(&mut self, path: &str) -> Result<()> {
        if path.is_empty() || !self.is_valid_path(Some(path))? {
            return Err(PathHelperError::InvalidParameter("set path attribute"));
        }
        self.path = path.to_string();
        Ok(())
    }

    fn resolve<'a>(&'a self, path: Option<&'a str>, operation: &'static str) -> Result<&'a str> {
        let resolved = path.unwrap_or(self.path.as_str());
        require_non_empty(resolved, operation)?;
        Ok(resolved)
    }

    // --- Path validation ---

    pub fn is_file(&self, path: Option<&str>) -> Result<bool> {
        let path = self.resolve(path, "validate file")?;
        Ok(Path::new(path).is_file())
    }

    pub fn is_directory(&self, path: Option<&str>) -> Result<bool> {
        let path = self.resolve(path, "validate directory")?;
        Ok(Path::new(path).is_dir())
    }

    /*
     * A path is considered valid if it names an existing file or directory, has a
     * parent component, or carries a file extension. A bare relative name without
     * an extension (e.g. "notes") is therefore only valid if it exists.
     */
    pub fn is_valid_path(&self, path: Option<&str>) -> Result<bool> {
        let is_file = self.is_file(path)?;
        let is_dir = self.is_directory(path)?;
        let has_parent = !self.get_parent_directory(path)?.is_empty();
        let has_extension = !self.get_file_extension(path)?.is_empty();
        Ok(is_file || is_dir || has_parent || has_extension)
    }

    pub fn path_exists(&self, path: Option<&str>) -> Result<bool> {
        let path = self.resolve(path, "validate path")?;
        Ok(Path::new(path).exists())
    }

    // --- Path manipulation ---

    pub fn path_join(&self, components: &[&str]) -> Result<String> {
        if components.is_empty() {
            return Err(PathHelperError::InvalidParameter("join path"));
        }
        let mut joined = PathBuf::new();
        for component in components {
            require_non_empty(component, "join path")?;
            joined.push(component);
        }
        Ok(to_display_string(&joined))
    }

    /*
     * Changes the process-wide working directory. This affects every later
     * relative-path call in the process, so the change is made under a global lock.
     */
    pub fn change_directory(&self, path: Option<&str>) -> Result<()> {
        let path = self.resolve(path, "change directory")?;
        let _guard = WORKING_DIRECTORY_LOCK
            .lock()
            .map_err(|_| PathHelperError::Os)?;
        std::env::set_current_dir(path)?;
        log::debug!("PathHelper: Working directory changed to '{path}'.");
        Ok(())
    }

    pub fn get_current_directory(&self) -> Result<PathBuf> {
        Ok(std::env::current_dir()?)
    }

    /// Returns the parent directory, or an empty string if the path has none.
    pub fn get_parent_directory(&self, path: Option<&str>) -> Result<String> {
        let path = self.resolve(path, "get parent directory")?;
        Ok(Path::new(path)
            .parent()
            .map(to_display_string)
            .unwrap_or_default())
    }

    /// Returns the final component of the path, or an empty string if there is none.
    pub fn get_base_name(&self, path: Option<&str>) -> Result<String> {
        let path = self.resolve(path, "get base name")?;
        Ok(Path::new(path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default())
    }

    /// Returns the extension including its leading dot (".txt"), or an empty string.
    pub fn get_file_extension(&self, path: Option<&str>) -> Result<String> {
        let path = self.resolve(path, "get file extension")?;
        Ok(Path::new(path)
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default())
    }

    // --- File operations ---

    /// Creates a new empty file. Fails with `AlreadyExists` if the file is present.
    pub fn create_file(&self, path: Option<&str>) -> Result<()> {
        let path = self.resolve(path, "create file")?;
        OpenOptions::new().write(true).create_new(true).open(path)?;
        Ok(())
    }

    pub fn rename_file(&self, new_path: &str, path: Option<&str>) -> Result<()> {
        require_non_empty(new_path, "rename file")?;
        let path = self.resolve(path, "rename file")?;
        fs::rename(path, new_path)?;
        Ok(())
    }

    pub fn delete_file(&self, path: Option<&str>) -> Result<()> {
        let path = self.resolve(path, "delete file")?;
        fs::remove_file(path)?;
        Ok(())
    }

    // --- File content management ---

    pub fn read_content(&self, path: Option<&str>) -> Result<String> {
        let path = self.resolve(path, "read content")?;
        Ok(fs::read_to_string(path)?)
    }

    /// Replaces the file content, creating the file if needed.
    pub fn write_content(&self, content: &str, path: Option<&str>) -> Result<()> {
        require_non_empty(content, "write content")?;
        let path = self.resolve(path, "write content")?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn append_content(&self, content: &str, path: Option<&str>) -> Result<()> {
        require_non_empty(content, "append content")?;
        let path = self.resolve(path, "append content")?;
        let mut file = OpenOptions::new().append(true).create(true).open(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }

    /// Reads the first line, including its line terminator if present.
    pub fn read_line(&self, path: Option<&str>) -> Result<String> {
        let path = self.resolve(path, "read line")?;
        let mut reader = BufReader::new(File::open(path)?);
        let mut line = String::new();
        reader.read_line(&mut line)?;
        Ok(line)
    }

    /*
     * Reads every line of the file. Line terminators are kept so that the result
     * can be handed back to `write_lines` unchanged.
     */
    pub fn read_all_lines(&self, path: Option<&str>) -> Result<Vec<String>> {
        let path = self.resolve(path, "read lines")?;
        let mut reader = BufReader::new(File::open(path)?);
        let mut lines = Vec::new();
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line)? == 0 {
                break;
            }
            lines.push(line);
        }
        Ok(lines)
    }

    /// Writes the lines verbatim (no separators are added), truncating the file first.
    pub fn write_lines(&self, lines: &[String], path: Option<&str>) -> Result<()> {
        if lines.is_empty() {
            return Err(PathHelperError::InvalidParameter("write lines"));
        }
        let path = self.resolve(path, "write lines")?;
        let mut file = File::create(path)?;
        for line in lines {
            file.write_all(line.as_bytes())?;
        }
        Ok(())
    }

    pub fn clear_file_content(&self, path: Option<&str>) -> Result<()> {
        let path = self.resolve(path, "clear content")?;
        File::create(path)?;
        Ok(())
    }

    // --- Directory operations ---

    /// Lists entry names (not full paths) of a directory, sorted by name.
    pub fn list_directory_contents(&self, path: Option<&str>) -> Result<Vec<String>> {
        let path = self.resolve(path, "list directory")?;
        let mut names = Vec::new();
        for entry in fs::read_dir(path)? {
            names.push(entry?.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    pub fn create_directory(&self, path: Option<&str>) -> Result<()> {
        let path = self.resolve(path, "create directory")?;
        fs::create_dir(path)?;
        Ok(())
    }

    pub fn rename_directory(&self, new_path: &str, path: Option<&str>) -> Result<()> {
        require_non_empty(new_path, "rename directory")?;
        let path = self.resolve(path, "rename directory")?;
        fs::rename(path, new_path)?;
        Ok(())
    }

    /// Removes an empty directory.
    pub fn delete_directory(&self, path: Option<&str>) -> Result<()> {
        let path = self.resolve(path, "delete directory")?;
        fs::remove_dir(path)?;
        Ok(())
    }
}

impl WorkingDirectoryOperations for PathHelper {
    fn is_directory(&self, path: &str) -> Result<bool> {
        PathHelper::is_directory(self, Some(path))
    }

    fn get_base_name(&self, path: &str) -> Result<String> {
        PathHelper::get_base_name(self, Some(path))
    }

    fn change_directory(&self, path: &str) -> Result<()> {
        PathHelper::change_directory(self, Some(path))
    }

    fn get_current_directory(&self) -> Result<PathBuf> {
        PathHelper::get_current_directory(self)
    }
}
