//! A small command-line harness over the value engine: parses a literal,
//! optionally combines it with a second operand through an operator, and
//! prints the result the way `PRINT` would.

use clap::Parser;
use colored::Colorize;

use basic_values::{format, parse, SlabStringSpace, Value, Values};

#[derive(Clone, Debug, Parser)]
#[clap(name = "basicval")]
struct Cli {
    /// A BASIC numeric or `&H`/`&O` literal, e.g. `3.14`, `&HFF`, `1D10`.
    operand: String,

    /// A second operand to combine `operand` with via `--op`.
    #[clap(long)]
    with: Option<String>,

    /// `+`, `-`, `*`, `/`, `\`, `MOD`, `^`.
    #[clap(long, default_value = "+")]
    op: String,

    /// Use double-precision math for EXP/SIN/COS/TAN/ATN/LOG.
    #[clap(long)]
    double_math: bool,
}

fn run(cli: Cli) -> basic_values::Result<()> {
    let engine = Values::new(SlabStringSpace::new(), cli.double_math);
    let left = parse::from_str(&cli.operand, true)?;

    let result = match cli.with {
        None => left,
        Some(rhs) => {
            let right = parse::from_str(&rhs, true)?;
            match cli.op.to_ascii_uppercase().as_str() {
                "+" => engine.add(left, right)?,
                "-" => engine.subtract(left, right)?,
                "*" => engine.multiply(left, right)?,
                "/" => engine.divide(left, right)?,
                "\\" => engine.divide_int(left, right)?,
                "MOD" => engine.modulo(left, right)?,
                "^" => engine.power(left, right)?,
                other => {
                    log::error!("unrecognized operator {other:?}");
                    return Err(basic_values::ValueError::SyntaxError);
                }
            }
        }
    };

    let rendered = match result {
        Value::String(desc) => String::from_utf8_lossy(&engine.strings().copy(desc)).into_owned(),
        numeric => format::number_to_str(&numeric, true, false)?,
    };
    println!("{}", rendered.trim().green());
    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("{}", format!("{err}").red());
        std::process::exit(1);
    }
}
