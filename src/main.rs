use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use jembed::{build, BuildConfig, BuildError, EmbeddedClass};
use log::{warn, LevelFilter};

#[derive(Parser)]
#[command(name = "jembed")]
#[command(about = "Compile Java sources and embed the classes into C++ tables")]
#[command(version)]
struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile sources, optionally archive them, and render the class table
    Build(BuildArgs),

    /// Render a single class file into its own C++ file
    Embed {
        #[arg(value_name = "CLASS")]
        class_file: PathBuf,

        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
    },

    /// Print the decoded name and methods of class files
    Inspect {
        #[arg(value_name = "CLASS", required = true)]
        class_files: Vec<PathBuf>,
    },
}

#[derive(Args)]
struct BuildArgs {
    /// A .java file or a directory searched recursively
    #[arg(long, visible_alias = "src", value_name = "PATH")]
    source: PathBuf,

    /// Passed to javac as --release
    #[arg(long, default_value = "8")]
    release: String,

    /// Where javac writes class files
    #[arg(long, value_name = "DIR", default_value = "build/java")]
    class_dir: PathBuf,

    /// Also archive the class directory into this jar
    #[arg(long, value_name = "JAR")]
    jarpath: Option<PathBuf>,

    /// Write the C++ class table here
    #[arg(short, long, value_name = "CPP")]
    output: Option<PathBuf>,

    /// Leave out class files that fail to decode instead of aborting
    #[arg(long)]
    skip_invalid: bool,

    #[arg(long, env = "JAVAC", default_value = "javac")]
    javac: String,

    #[arg(long, env = "JAR", default_value = "jar")]
    jar: String,
}

impl From<BuildArgs> for BuildConfig {
    fn from(args: BuildArgs) -> Self {
        BuildConfig {
            source: args.source,
            release: args.release,
            class_dir: args.class_dir,
            jar_path: args.jarpath,
            cpp_output: args.output,
            skip_invalid: args.skip_invalid,
            javac: args.javac,
            jar: args.jar,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    pretty_env_logger::formatted_builder()
        .filter_level(level)
        .parse_filters(&std::env::var("RUST_LOG").unwrap_or_default())
        .init();

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Build(args) => {
            let config = BuildConfig::from(args);
            match build::run(&config) {
                Err(BuildError::NoSources(path)) => {
                    warn!("No Java sources found in {}", path.display());
                    std::process::exit(1);
                }
                result => result.context("build failed")?,
            }
        }
        Commands::Embed { class_file, output } => {
            build::embed_single(&class_file, &output)
                .with_context(|| format!("could not embed {}", class_file.display()))?;
        }
        Commands::Inspect { class_files } => {
            for path in class_files {
                let EmbeddedClass { class, .. } = EmbeddedClass::read(&path)?;
                println!("{}", class.qualified_name);
                for method in &class.methods {
                    println!("    {}", method);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_should_accept_src_as_an_alias_for_source() {
        let cli = Cli::try_parse_from(["jembed", "build", "--src", "java", "-o", "classes.cpp"]).unwrap();

        let Commands::Build(args) = cli.command else {
            panic!("expected the build command");
        };
        let config = BuildConfig::from(args);
        assert_eq!(PathBuf::from("java"), config.source);
        assert_eq!(Some(PathBuf::from("classes.cpp")), config.cpp_output);
        assert_eq!("8", config.release);
        assert_eq!(PathBuf::from("build/java"), config.class_dir);
    }

    #[test]
    fn it_should_reject_the_single_dash_spelling() {
        assert!(Cli::try_parse_from(["jembed", "build", "-src", "java"]).is_err());
    }
}
