// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! binobj-dump - Decode and print binobj streams
//!
//! Reads one or more concatenated top-level objects from a file and prints
//! each one. Only the built-in model types are known.

use binobj::{model, BinaryObject, CodecConfig, Node, Range, TypeRegistry};
use clap::Parser;
use colored::*;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter};
use std::path::PathBuf;

/// Decode and print binobj streams
#[derive(Parser, Debug)]
#[command(name = "binobj-dump")]
#[command(version)]
#[command(about = "Decode and print binobj streams")]
struct Args {
    /// Stream file to decode
    #[arg(required_unless_present_any = ["ids", "encode_sample"])]
    input: Option<PathBuf>,

    /// YAML decode limits (max_count, max_string_len, max_depth)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the maximum tree depth
    #[arg(long)]
    max_depth: Option<usize>,

    /// Output format: outline, debug
    #[arg(short, long, default_value = "outline")]
    format: OutputFormat,

    /// List registered type ids and exit
    #[arg(long)]
    ids: bool,

    /// Write a sample tree to PATH and exit
    #[arg(long, value_name = "PATH")]
    encode_sample: Option<PathBuf>,
}

#[derive(Clone, Debug)]
enum OutputFormat {
    Outline,
    Debug,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "outline" | "o" => Ok(OutputFormat::Outline),
            "debug" | "d" => Ok(OutputFormat::Debug),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

fn main() {
    env_logger::init();

    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let registry = TypeRegistry::new();
    model::register_model(&registry)?;

    if args.ids {
        for id in registry.ids() {
            let descriptor = registry.lookup(&id)?;
            println!("{}  {}", id, descriptor.name().cyan());
        }
        return Ok(());
    }

    if let Some(path) = &args.encode_sample {
        let mut out = BufWriter::new(File::create(path)?);
        registry.write_object(&mut out, &sample_tree())?;
        eprintln!("{} wrote sample tree to {}", ">>>".green().bold(), path.display());
        return Ok(());
    }

    let config = load_config(args)?;
    let Some(path) = &args.input else {
        return Err("no input file".into());
    };
    let mut reader = BufReader::new(File::open(path)?);

    let mut index = 0usize;
    while !reader.fill_buf()?.is_empty() {
        let obj = registry.read_object(&mut reader, config)?;
        log::debug!("[binobj-dump] object {} is {}", index, obj.type_name());
        print_object(index, obj.as_ref(), &args.format);
        index += 1;
    }

    if index == 0 {
        eprintln!("{}", "(empty stream)".dimmed());
    }
    Ok(())
}

fn load_config(args: &Args) -> Result<CodecConfig, binobj::Error> {
    let mut config = match &args.config {
        Some(path) => CodecConfig::from_yaml_file(path)?,
        None => CodecConfig::from_env()?,
    };
    if let Some(depth) = args.max_depth {
        config = config.with_max_depth(depth);
        config.validate()?;
    }
    Ok(config)
}

fn print_object(index: usize, obj: &dyn BinaryObject, format: &OutputFormat) {
    println!(
        "{} {} ({})",
        format!("#{}", index).bold(),
        obj.type_name().cyan(),
        obj.binary_id().to_string().dimmed()
    );
    match format {
        OutputFormat::Debug => println!("{:#?}", obj),
        OutputFormat::Outline => {
            if let Some(node) = obj.downcast_ref::<Node>() {
                print!("{}", node);
                println!(
                    "{}",
                    format!("  ({} nodes, depth {})", node.node_count(), node.depth()).dimmed()
                );
            } else if let Some(range) = obj.downcast_ref::<Range>() {
                println!("[{}, {})", range.start, range.end());
            } else {
                println!("{:?}", obj);
            }
        }
    }
}

fn sample_tree() -> Node {
    Node::new("root", Range::new(0, 100))
        .with_child(
            Node::new("header", Range::new(0, 16))
                .with_child(Node::new("magic", Range::new(0, 4)))
                .with_child(Node::new("version", Range::new(4, 4))),
        )
        .with_child(Node::new("body", Range::new(16, 84)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv.iter().copied()).expect("valid arguments")
    }

    #[test]
    fn test_output_format_parsing() {
        assert!(matches!("outline".parse::<OutputFormat>(), Ok(OutputFormat::Outline)));
        assert!(matches!("D".parse::<OutputFormat>(), Ok(OutputFormat::Debug)));
        let err = "yaml".parse::<OutputFormat>().unwrap_err();
        assert_eq!(err, "Unknown format: yaml");
    }

    #[test]
    fn test_input_required_unless_listing() {
        assert!(Args::try_parse_from(["binobj-dump"]).is_err());
        assert!(parse(&["binobj-dump", "--ids"]).ids);
        assert!(parse(&["binobj-dump", "--encode-sample", "out.bin"])
            .encode_sample
            .is_some());
    }

    #[test]
    fn test_zero_max_depth_rejected() {
        let args = parse(&["binobj-dump", "--max-depth", "0", "in.bin"]);
        assert!(matches!(load_config(&args), Err(binobj::Error::Config(_))));
    }

    #[test]
    fn test_config_file_and_depth_override() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "max_count: 12\nmax_depth: 4").expect("write config");
        let path = file.path().to_string_lossy().into_owned();

        let args = parse(&["binobj-dump", "-c", &path, "--max-depth", "9", "in.bin"]);
        let config = load_config(&args).expect("load config");
        assert_eq!(config.max_count, 12);
        assert_eq!(config.max_depth, 9);
    }

    #[test]
    fn test_sample_tree_decodes() {
        let registry = TypeRegistry::new();
        model::register_model(&registry).expect("register model");
        let bytes = registry.to_bytes(&sample_tree()).expect("encode");
        let back: Node = registry
            .from_bytes_as(&bytes, CodecConfig::default())
            .expect("decode");
        assert_eq!(back.node_count(), 5);
        assert!(back == sample_tree());
    }
}
