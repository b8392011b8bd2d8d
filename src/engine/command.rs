//! ffmpeg command model
//!
//! A [`MediaCommand`] is a fully planned ffmpeg invocation: one or more
//! input/output jobs plus any small text files (concat lists) that have to
//! exist before the process starts. Building a command never touches the
//! file system; the executor materialises staged files and spawns it.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Options applied to one `-i` input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSpec {
    pub options: Vec<String>,
    pub path: PathBuf,
}

/// Options applied to one output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSpec {
    pub options: Vec<String>,
    pub path: PathBuf,
}

/// Text file written by the executor right before the command runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub path: PathBuf,
    pub contents: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Job {
    input: InputSpec,
    output: OutputSpec,
}

/// A planned ffmpeg invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaCommand {
    program: PathBuf,
    global_options: Vec<String>,
    jobs: Vec<Job>,
    staged: Vec<StagedFile>,
}

impl MediaCommand {
    /// Create an empty command for `program`
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            global_options: Vec::new(),
            jobs: Vec::new(),
            staged: Vec::new(),
        }
    }

    /// Add options placed before every input
    pub fn global_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.global_options
            .extend(options.into_iter().map(Into::into));
        self
    }

    /// Add an input/output pair; the output maps every stream of its input
    pub fn job(mut self, input: InputSpec, output: OutputSpec) -> Self {
        self.jobs.push(Job { input, output });
        self
    }

    /// Attach a file the executor must write before spawning
    pub fn stage(mut self, file: StagedFile) -> Self {
        self.staged.push(file);
        self
    }

    /// Join independent commands into one multi-output invocation.
    ///
    /// Commands must share program and global options; any that do not are
    /// returned unmerged. Returns an empty vector for empty input.
    pub fn merge(commands: Vec<MediaCommand>) -> Vec<MediaCommand> {
        let mut merged: Vec<MediaCommand> = Vec::new();
        for command in commands {
            match merged.iter_mut().find(|m| {
                m.program == command.program && m.global_options == command.global_options
            }) {
                Some(target) => {
                    target.jobs.extend(command.jobs);
                    target.staged.extend(command.staged);
                }
                None => merged.push(command),
            }
        }
        merged
    }

    /// Executable to spawn
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Files to write before spawning
    pub fn staged_files(&self) -> &[StagedFile] {
        &self.staged
    }

    /// Output files in job order
    pub fn outputs(&self) -> impl Iterator<Item = &Path> {
        self.jobs.iter().map(|job| job.output.path.as_path())
    }

    /// Number of input/output jobs
    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// Command-line arguments, excluding the program itself
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.global_options.iter().map(OsString::from).collect();

        for job in &self.jobs {
            args.extend(job.input.options.iter().map(OsString::from));
            args.push("-i".into());
            args.push(job.input.path.clone().into_os_string());
        }

        for (index, job) in self.jobs.iter().enumerate() {
            args.push("-map".into());
            args.push(index.to_string().into());
            args.extend(job.output.options.iter().map(OsString::from));
            args.push(job.output.path.clone().into_os_string());
        }

        args
    }

    /// Shell-quoted command line for logs and diagnostics
    pub fn to_shell_line(&self) -> String {
        std::iter::once(self.program.as_os_str().to_os_string())
            .chain(self.args())
            .map(|arg| shell_quote(&arg.to_string_lossy()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Quote one argument for a POSIX shell
pub fn shell_quote(arg: &str) -> String {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "@%+=:,./-_".contains(c));
    if safe {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r#"'"'"'"#))
    }
}
