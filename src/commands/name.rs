use clap::Args;
use serde::Serialize;

use recase::case::{classify, to_kebab_case, to_pascal_case, AcronymSet, Convention};
use recase::Direction;

use crate::commands::CmdResult;

#[derive(Args)]
pub struct NameArgs {
    /// Names to classify and convert
    #[arg(required = true)]
    names: Vec<String>,

    /// Only convert names in this direction's source convention
    #[arg(short, long)]
    direction: Option<String>,

    /// Extra acronym to recognize (repeatable)
    #[arg(long = "acronym", value_name = "ACRONYM")]
    acronyms: Vec<String>,
}

#[derive(Serialize)]
pub struct NameOutput {
    pub command: &'static str,
    pub names: Vec<NameReport>,
}

#[derive(Serialize)]
pub struct NameReport {
    pub name: String,
    pub convention: Option<Convention>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub converted: Option<String>,
    /// The converted name turned back again; equal to `name` when the
    /// conversion is lossless.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round_trip: Option<String>,
}

impl NameReport {
    fn is_lossy(&self) -> bool {
        self.round_trip.as_ref().is_some_and(|r| *r != self.name)
    }
}

pub fn run(args: NameArgs) -> CmdResult<NameOutput> {
    let only = args.direction.as_deref().map(Direction::from_str).transpose()?;
    let acronyms = AcronymSet::with_extra(&args.acronyms);

    let names: Vec<NameReport> = args
        .names
        .into_iter()
        .map(|name| report(name, only, &acronyms))
        .collect();

    let exit_code = if names.iter().any(NameReport::is_lossy) { 1 } else { 0 };

    Ok((
        NameOutput {
            command: "name",
            names,
        },
        exit_code,
    ))
}

fn report(name: String, only: Option<Direction>, acronyms: &AcronymSet) -> NameReport {
    let convention = classify(&name);
    let direction = match (convention, only) {
        (Some(c), Some(d)) if d.source() == c => Some(d),
        (Some(Convention::Pascal), None) => Some(Direction::PascalToKebab),
        (Some(Convention::Kebab), None) => Some(Direction::KebabToPascal),
        _ => None,
    };

    let converted = direction.and_then(|d| d.convert(&name, acronyms));
    let round_trip = converted.as_deref().map(|c| match direction {
        Some(Direction::PascalToKebab) => to_pascal_case(c, acronyms),
        _ => to_kebab_case(c, acronyms),
    });

    NameReport {
        name,
        convention,
        converted,
        round_trip,
    }
}
