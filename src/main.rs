use std::io::Write;
use std::path::Path;

use anyhow::Context;
use clap::{arg, command, Arg, ArgMatches, Command};
use huffcode::{CodecConfig, HuffmanCodec, UnknownSymbolPolicy};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let matches = cli().get_matches();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(&matches, &mut out)
}

fn cli() -> Command<'static> {
    let path_arg = || arg!(path: <PATH> "Input file the code is built from");
    command!()
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("tree")
                .about("Print the Huffman tree built from a file")
                .arg(path_arg()),
        )
        .subcommand(
            Command::new("frequencies")
                .about("Print the byte frequencies of a file")
                .arg(path_arg()),
        )
        .subcommand(
            Command::new("codes")
                .about("Print the code of every byte in a file")
                .arg(path_arg()),
        )
        .subcommand(
            Command::new("encode")
                .about("Encode a file as a '0'/'1' string")
                .arg(arg!(path: <PATH> "File to encode"))
                .arg(
                    Arg::new("code-from")
                        .long("code-from")
                        .value_name("FILE")
                        .takes_value(true)
                        .help("Build the code from FILE instead of from PATH itself"),
                )
                .arg(
                    Arg::new("skip-unknown")
                        .long("skip-unknown")
                        .help("Skip bytes without a code instead of failing"),
                ),
        )
        .subcommand(
            Command::new("decode")
                .about("Decode a '0'/'1' string with the code built from a file")
                .arg(path_arg())
                .arg(arg!(bits: <BITS> "Encoded bit string")),
        )
}

fn run<W: Write>(matches: &ArgMatches, out: &mut W) -> anyhow::Result<()> {
    let (name, sub) = matches.subcommand().context("no subcommand given")?;
    let path = sub.get_one::<String>("path").context("missing input path")?;

    match name {
        "tree" => match load_codec(Path::new(path))?.tree() {
            Some(tree) => write!(out, "{}", tree)?,
            None => log::warn!("{} is empty, no tree was built", path),
        },
        "frequencies" => write!(out, "{}", load_codec(Path::new(path))?.frequencies())?,
        "codes" => write!(out, "{}", load_codec(Path::new(path))?.code_table())?,
        "encode" => {
            let data = std::fs::read(path).with_context(|| format!("reading {}", path))?;
            let codec = match sub.get_one::<String>("code-from") {
                Some(code_path) => load_codec(Path::new(code_path))?,
                None => HuffmanCodec::from_bytes(&data),
            };
            let policy = if sub.is_present("skip-unknown") {
                UnknownSymbolPolicy::SkipWithWarning
            } else {
                UnknownSymbolPolicy::Fail
            };
            let codec = codec.with_config(CodecConfig::default().unknown_symbol(policy));
            let bits = codec.encode(&data).context("encoding failed")?;
            writeln!(out, "{}", bits)?;
        }
        "decode" => {
            let bits = sub.get_one::<String>("bits").context("missing bit string")?;
            let decoded = load_codec(Path::new(path))?
                .decode_str(bits.trim())
                .context("decoding failed")?;
            out.write_all(&decoded)?;
            writeln!(out)?;
        }
        other => anyhow::bail!("unknown subcommand {}", other),
    }

    Ok(())
}

fn load_codec(path: &Path) -> anyhow::Result<HuffmanCodec> {
    HuffmanCodec::from_file(path).with_context(|| format!("building code from {}", path.display()))
}
