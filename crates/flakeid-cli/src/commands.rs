use std::io::Write;

use anyhow::Context;
use flakeid::{
    Case, DEFAULT_EPOCH, DEFAULT_NODE_BITS, GeneratorBuilder, SnowflakeGenerator, SnowflakeId,
    basen, epoch_millis,
};

use crate::config::{CliConfig, Command, GeneratorSettings, Output};

/// Runs the configured command, writing its result lines to `out`.
pub fn run(config: &CliConfig, out: &mut impl Write) -> anyhow::Result<()> {
    match &config.command {
        Command::Generate {
            count,
            output,
            atomic,
        } => {
            let generator = build_generator(GeneratorBuilder::new(), &config.settings, *atomic)?;
            generate(generator.as_ref(), *count, output, out)
        }
        Command::Encode { id, base } => {
            let text = match base {
                Some(base) => id.encode_base(*base)?,
                None => id.encode().into(),
            };
            writeln!(out, "{text}")?;
            Ok(())
        }
        Command::Decode { text, base } => {
            let id = match base {
                Some(base) => SnowflakeId::from_raw(basen::decode(text, *base)?),
                None => SnowflakeId::from_string(text)?,
            };
            writeln!(out, "{}", id.to_raw())?;
            Ok(())
        }
        Command::Inspect { id } => inspect(*id, &config.settings, out),
    }
}

/// Applies the explicit settings on top of `builder`; whatever is unset
/// resolves from the environment unless `builder` ignores it.
fn build_generator(
    mut builder: GeneratorBuilder,
    settings: &GeneratorSettings,
    atomic: bool,
) -> anyhow::Result<Box<dyn SnowflakeGenerator>> {
    if let Some(node) = settings.node {
        builder = builder.with_node(node);
    }
    if let Some(bits) = settings.node_bits {
        builder = builder.with_node_bits(bits);
    }
    if let Some(epoch) = settings.epoch_ms {
        builder = builder.with_epoch_millis(epoch);
    }

    let generator: Box<dyn SnowflakeGenerator> = if atomic {
        Box::new(builder.build_atomic().context("failed to build generator")?)
    } else {
        Box::new(builder.build().context("failed to build generator")?)
    };
    Ok(generator)
}

fn generate(
    generator: &dyn SnowflakeGenerator,
    count: usize,
    output: &Output,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let config = generator.config();
    tracing::debug!(
        count,
        node = config.node(),
        node_bits = config.node_bits(),
        "generating ids"
    );

    for _ in 0..count {
        let id = generator.create();
        match output {
            Output::Canonical(Case::Upper) => writeln!(out, "{id}")?,
            Output::Canonical(Case::Lower) => writeln!(out, "{}", id.to_lower())?,
            Output::Template(template) => writeln!(out, "{}", id.format(template)?)?,
        }
    }
    Ok(())
}

fn inspect(
    id: SnowflakeId,
    settings: &GeneratorSettings,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let node_bits = settings.node_bits.unwrap_or(DEFAULT_NODE_BITS);
    let epoch = settings.epoch_ms.unwrap_or_else(|| epoch_millis(DEFAULT_EPOCH));
    let bytes: String = id
        .to_bytes()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect();

    writeln!(out, "raw        {}", id.to_raw())?;
    writeln!(out, "long       {}", id.to_long())?;
    writeln!(out, "canonical  {id}")?;
    writeln!(out, "bytes      {bytes}")?;
    writeln!(out, "time       {}", id.time_field())?;
    writeln!(out, "unix_ms    {}", id.unix_millis(epoch))?;
    writeln!(out, "node_bits  {node_bits}")?;
    writeln!(out, "node       {}", id.node(node_bits))?;
    writeln!(out, "counter    {}", id.counter(node_bits))?;
    Ok(())
}
