use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{debug, info, info_span};

use recode_core::{compile_dictionary, resolve, resolve_frame};
use recode_ingest::{CsvOptions, read_dictionary, read_frame, write_frame};
use recode_model::{
    Categorical, DictionaryTable, FrameOptions, ResolveOptions, ValueVector, Values,
};

use crate::cli::{ApplyArgs, DictionaryArgs, InspectArgs, VectorArgs};
use crate::types::{ApplyResult, InspectResult, VectorResult};

fn csv_options(args: &DictionaryArgs) -> Result<CsvOptions> {
    if !args.delimiter.is_ascii() {
        bail!("delimiter must be a single ASCII character, got '{}'", args.delimiter);
    }
    Ok(CsvOptions::new()
        .with_delimiter(args.delimiter as u8)
        .with_na_tokens(args.na_tokens.clone()))
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn load_dictionary(args: &DictionaryArgs, options: &CsvOptions) -> Result<DictionaryTable> {
    let dictionary = read_dictionary(&args.dictionary, options)
        .with_context(|| format!("read dictionary: {}", args.dictionary.display()))?;
    debug!(
        columns = dictionary.width(),
        rows = dictionary.height(),
        "loaded dictionary"
    );
    Ok(dictionary)
}

fn resolve_options(args: &DictionaryArgs) -> ResolveOptions {
    ResolveOptions::new()
        .with_columns(args.from.clone(), args.to.clone())
        .with_anchor_regex(!args.no_anchor_regex)
        .with_dictionary_label(file_label(&args.dictionary))
}

pub fn run_apply(args: &ApplyArgs) -> Result<ApplyResult> {
    let span = info_span!("apply", data = %args.data.display());
    let _guard = span.enter();

    let csv = csv_options(&args.dictionary)?;
    let dictionary = load_dictionary(&args.dictionary, &csv)?;
    let mut frame = read_frame(&args.data, &csv)
        .with_context(|| format!("read data: {}", args.data.display()))?;
    let options = FrameOptions {
        from: args.dictionary.from.clone(),
        to: args.dictionary.to.clone(),
        by: args.by.clone(),
        order: args.order.clone(),
        warn: args.warn,
        anchor_regex: !args.dictionary.no_anchor_regex,
    };
    let report = resolve_frame(&mut frame, &dictionary, &options)
        .with_context(|| format!("resolve data: {}", args.data.display()))?;
    info!(
        columns = report.columns.len(),
        changed = report.changed(),
        "resolved data"
    );

    if let Some(output) = &args.output {
        write_frame(&mut frame, output)
            .with_context(|| format!("write output: {}", output.display()))?;
        info!(path = %output.display(), "wrote output");
    }
    Ok(ApplyResult {
        data: args.data.clone(),
        output: args.output.clone(),
        rows: frame.height(),
        report,
    })
}

pub fn run_vector(args: &VectorArgs) -> Result<VectorResult> {
    let csv = csv_options(&args.dictionary)?;
    let dictionary = load_dictionary(&args.dictionary, &csv)?;
    let values: Vec<Option<&str>> = args
        .values
        .iter()
        .map(|value| (!csv.na_tokens.contains(value)).then_some(value.as_str()))
        .collect();
    let input = if args.categorical {
        ValueVector::categorical(Categorical::from_labels(&values, true))
    } else {
        ValueVector::text(values)
    };
    let options = resolve_options(&args.dictionary)
        .with_quiet(args.silent)
        .with_warn_default(!args.no_warn_default)
        .with_input_label("the arguments");

    let resolution = resolve(&input, &dictionary, &options).context("resolve values")?;
    let levels = match resolution.values.values() {
        Values::Categorical(categorical) => Some(categorical.levels().to_vec()),
        Values::Text(_) => None,
    };
    let labels = resolution
        .values
        .labels()
        .into_iter()
        .map(|label| label.map(str::to_string))
        .collect();
    Ok(VectorResult {
        labels,
        levels,
        diagnostics: resolution.diagnostics,
        changed: resolution.changed,
    })
}

pub fn run_inspect(args: &InspectArgs) -> Result<InspectResult> {
    let csv = csv_options(&args.dictionary)?;
    let dictionary = load_dictionary(&args.dictionary, &csv)?;
    let rules = compile_dictionary(&dictionary, &resolve_options(&args.dictionary))
        .with_context(|| format!("compile dictionary: {}", args.dictionary.dictionary.display()))?;
    Ok(InspectResult {
        dictionary: args.dictionary.dictionary.clone(),
        rules,
    })
}
