use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use flakeid::{Case, MAX_NODE_BITS, SnowflakeId, basen};

/// Largest batch `generate` accepts in one run.
pub const MAX_COUNT: usize = 10_000_000;

/// Command-line arguments for the `flakeid` binary.
///
/// Generator settings can also come from the environment (or a `.env` file)
/// so a deployment can pin its node id once.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "flakeid",
    version,
    about = "Generate, encode and inspect 64-bit time-sortable identifiers"
)]
pub struct CliArgs {
    /// Node id embedded in generated ids. Random when unset.
    ///
    /// Environment variable: `SNOWFLAKEID_NODE`
    #[arg(long, global = true, env = "SNOWFLAKEID_NODE")]
    pub node: Option<u32>,

    /// Bits of the 22-bit tail reserved for the node id (0 to 20).
    ///
    /// Also used by `inspect` to split the tail. Defaults to 10.
    ///
    /// Environment variable: `SNOWFLAKEID_NODE_BITS`
    #[arg(long, global = true, env = "SNOWFLAKEID_NODE_BITS")]
    pub node_bits: Option<u8>,

    /// Custom epoch in milliseconds since 1970-01-01T00:00:00Z. Defaults to
    /// 2023-01-01T00:00:00Z.
    ///
    /// Environment variable: `SNOWFLAKEID_EPOCH_MS`
    #[arg(long, global = true, env = "SNOWFLAKEID_EPOCH_MS", allow_hyphen_values = true)]
    pub epoch_ms: Option<i64>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CliCommand {
    /// Print freshly generated ids, one per line.
    Generate {
        /// How many ids to print.
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,

        /// Output template with one placeholder: %S %s %X %x %d %z.
        #[arg(long, conflicts_with = "lower")]
        template: Option<String>,

        /// Print canonical strings in lowercase.
        #[arg(long)]
        lower: bool,

        /// Use the lock-free generator.
        #[arg(long)]
        atomic: bool,
    },

    /// Encode a value as a canonical string, or in another base.
    Encode {
        /// Decimal integer (signed or unsigned) or canonical string.
        #[arg(allow_hyphen_values = true)]
        value: String,

        /// Target base (2 to 62). Canonical Crockford base32 when unset.
        #[arg(long)]
        base: Option<u32>,
    },

    /// Decode text back to its unsigned decimal value.
    Decode {
        text: String,

        /// Source base (2 to 62). Canonical Crockford base32 when unset.
        #[arg(long)]
        base: Option<u32>,
    },

    /// Break an id into its fields.
    Inspect {
        /// Decimal integer or canonical string.
        #[arg(allow_hyphen_values = true)]
        id: String,
    },
}

/// Generator settings left unset fall through to the library's own
/// resolution (environment, then defaults).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeneratorSettings {
    pub node: Option<u32>,
    pub node_bits: Option<u8>,
    pub epoch_ms: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Canonical(Case),
    Template(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Generate {
        count: usize,
        output: Output,
        atomic: bool,
    },
    Encode {
        id: SnowflakeId,
        base: Option<u32>,
    },
    Decode {
        text: String,
        base: Option<u32>,
    },
    Inspect {
        id: SnowflakeId,
    },
}

/// Validated configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub settings: GeneratorSettings,
    pub command: Command,
}

impl TryFrom<CliArgs> for CliConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if let Some(bits) = args.node_bits {
            if bits > MAX_NODE_BITS {
                bail!("NODE_BITS ({bits}) must be between 0 and {MAX_NODE_BITS}");
            }
            // an unset width may still resolve from SNOWFLAKEID_NODE_COUNT, so
            // only explicit bits are checked here
            if let Some(node) = args.node {
                let max_node = (1_u32 << bits) - 1;
                if node > max_node {
                    bail!(
                        "NODE ({node}) exceeds the node id space for {bits} node bits (max = {max_node})"
                    );
                }
            }
        }

        let command = match args.command {
            CliCommand::Generate {
                count,
                template,
                lower,
                atomic,
            } => {
                if count == 0 {
                    bail!("COUNT must be greater than 0");
                }
                if count > MAX_COUNT {
                    bail!("COUNT ({count}) exceeds the per-run limit ({MAX_COUNT})");
                }
                let output = match template {
                    Some(template) => {
                        SnowflakeId::MIN
                            .format(&template)
                            .with_context(|| format!("invalid --template {template:?}"))?;
                        Output::Template(template)
                    }
                    None if lower => Output::Canonical(Case::Lower),
                    None => Output::Canonical(Case::Upper),
                };
                Command::Generate {
                    count,
                    output,
                    atomic,
                }
            }
            CliCommand::Encode { value, base } => {
                check_base(base)?;
                Command::Encode {
                    id: parse_id(&value)?,
                    base,
                }
            }
            CliCommand::Decode { text, base } => {
                check_base(base)?;
                Command::Decode { text, base }
            }
            CliCommand::Inspect { id } => Command::Inspect { id: parse_id(&id)? },
        };

        Ok(Self {
            settings: GeneratorSettings {
                node: args.node,
                node_bits: args.node_bits,
                epoch_ms: args.epoch_ms,
            },
            command,
        })
    }
}

fn check_base(base: Option<u32>) -> anyhow::Result<()> {
    if let Some(base) = base {
        if !(basen::MIN_BASE..=basen::MAX_BASE).contains(&base) {
            bail!("BASE ({base}) must be between {} and {}", basen::MIN_BASE, basen::MAX_BASE);
        }
    }
    Ok(())
}

/// Accepts an unsigned or signed decimal integer, or a canonical string.
pub fn parse_id(value: &str) -> anyhow::Result<SnowflakeId> {
    if let Ok(raw) = value.parse::<u64>() {
        return Ok(SnowflakeId::from_raw(raw));
    }
    if let Ok(long) = value.parse::<i64>() {
        return Ok(SnowflakeId::from_long(long));
    }
    SnowflakeId::from_string(value)
        .with_context(|| format!("{value:?} is neither a decimal integer nor a canonical id"))
}
