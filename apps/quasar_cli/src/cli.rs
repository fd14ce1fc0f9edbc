//! Argument parsing and command dispatch.
//!
//! Built on `clap` derive macros; each [`Commands`] variant maps to one
//! handler. [`run_cli`] returns the process exit code: `0` success, `1`
//! compilation error, `2` runtime error during `run`.

use clap::{Parser, Subcommand};
use quasar_base::Diagnostic;
use quasar_compile::compile::{compile_file, CompileOutput};
use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::report;
use crate::style::Style;

/// Command-line interface for the Quasar compiler.
#[derive(Parser)]
#[command(name = "quasar")]
#[command(about = "The Quasar to Python compiler", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Compile a `.qsr` file to Python.
    ///
    /// Writes `<stem>.py` next to the input unless `-o` names an output;
    /// local imports are written as sibling modules either way.
    Compile {
        /// The Quasar source file.
        file: PathBuf,
        /// Output path for the emitted Python.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Compile a `.qsr` file and execute it with the host `python3`.
    Run {
        /// The Quasar source file.
        file: PathBuf,
    },

    /// Run the pipeline and report success or diagnostics without writing
    /// any output.
    Check {
        /// The Quasar source file.
        file: PathBuf,
        /// Emit diagnostics as JSON instead of human-readable text.
        #[arg(long)]
        json: bool,
    },
}

/// Parses arguments and dispatches. Returns the process exit code.
pub fn run_cli() -> i32 {
    let cli = Cli::parse();
    match cli.command {
        Commands::Compile { file, out } => cmd_compile(&file, out.as_deref()),
        Commands::Run { file } => cmd_run(&file),
        Commands::Check { file, json } => cmd_check(&file, json),
    }
}

fn use_color() -> bool {
    std::io::stderr().is_terminal()
}

fn print_diagnostics(diagnostics: &[Diagnostic]) {
    eprint!("{}", report::render_all(diagnostics, use_color()));
}

/// `<dir>/<stem>.py` for the given source path.
pub fn default_output_path(file: &Path) -> PathBuf {
    let stem = file
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "out".to_string());
    file.with_file_name(format!("{}.py", stem))
}

/// Writes the root program and each compiled local module next to it.
fn write_output(output: &CompileOutput, out_path: &Path) -> std::io::Result<()> {
    fs::write(out_path, &output.python)?;
    let dir = out_path.parent().unwrap_or_else(|| Path::new("."));
    for (name, python) in &output.modules {
        fs::write(dir.join(format!("{}.py", name)), python)?;
    }
    Ok(())
}

fn cmd_compile(file: &Path, out: Option<&Path>) -> i32 {
    match compile_file(file) {
        Ok(output) => {
            print_diagnostics(&output.warnings);
            let out_path = out
                .map(Path::to_path_buf)
                .unwrap_or_else(|| default_output_path(file));
            if let Err(err) = write_output(&output, &out_path) {
                eprintln!("error: cannot write `{}`: {}", out_path.display(), err);
                return 1;
            }
            0
        }
        Err(diagnostics) => {
            print_diagnostics(&diagnostics);
            1
        }
    }
}

fn cmd_run(file: &Path) -> i32 {
    let output = match compile_file(file) {
        Ok(output) => output,
        Err(diagnostics) => {
            print_diagnostics(&diagnostics);
            return 1;
        }
    };
    print_diagnostics(&output.warnings);

    // Materialize the program (and its modules) in a scratch directory so
    // `import utils` resolves, then hand off to the host interpreter.
    let dir = match tempfile::tempdir() {
        Ok(dir) => dir,
        Err(err) => {
            eprintln!("error: cannot create a temporary directory: {}", err);
            return 1;
        }
    };
    let main_path = dir.path().join("main.py");
    if let Err(err) = fs::write(&main_path, &output.python) {
        eprintln!("error: cannot write `{}`: {}", main_path.display(), err);
        return 1;
    }
    for (name, python) in &output.modules {
        let module_path = dir.path().join(format!("{}.py", name));
        if let Err(err) = fs::write(&module_path, python) {
            eprintln!("error: cannot write `{}`: {}", module_path.display(), err);
            return 1;
        }
    }

    match Command::new("python3").arg(&main_path).status() {
        Ok(status) if status.success() => 0,
        Ok(_) => 2,
        Err(err) => {
            eprintln!("error: cannot invoke python3: {}", err);
            2
        }
    }
}

fn cmd_check(file: &Path, json: bool) -> i32 {
    match compile_file(file) {
        Ok(output) => {
            if json {
                println!("{}", report::render_json(&output.warnings));
            } else {
                print_diagnostics(&output.warnings);
                let message = format!("ok: {}", file.display());
                if use_color() {
                    eprintln!("{}", Style::green(&message));
                } else {
                    eprintln!("{}", message);
                }
            }
            0
        }
        Err(diagnostics) => {
            if json {
                println!("{}", report::render_json(&diagnostics));
            } else {
                print_diagnostics(&diagnostics);
            }
            1
        }
    }
}
