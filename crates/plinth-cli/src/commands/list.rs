//! Implementation of `plinth list`.

use crate::{
    cli::{ListArgs, ListFormat},
    commands::catalog::{Catalog, TemplateInfo},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: ListArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let templates_dir = args.templates_dir.or(config.scaffold.templates_dir);
    let templates = Catalog::load(templates_dir.as_deref())?.describe()?;

    match args.format {
        ListFormat::Table => {
            output.header("Available Templates:")?;
            let width = templates.iter().map(|t| t.name.len()).max().unwrap_or(0);
            for t in &templates {
                output.print(&format!(
                    "  {:<width$}  {}  [{}] ({})",
                    t.name,
                    t.path,
                    t.slots.join(", "),
                    t.source.as_str(),
                ))?;
            }
        }
        // Machine formats go straight to stdout, even in quiet mode.
        ListFormat::Json => output.json(&templates)?,
        ListFormat::List => {
            for t in &templates {
                println!("{}", t.name);
            }
        }
        ListFormat::Csv => {
            println!("name,path,slots,source");
            for t in &templates {
                println!("{}", csv_row(t));
            }
        }
    }

    Ok(())
}

fn csv_row(t: &TemplateInfo) -> String {
    let slots = t.slots.join(";");
    [t.name.as_str(), t.path.as_str(), slots.as_str(), t.source.as_str()]
        .into_iter()
        .map(csv_field)
        .collect::<Vec<_>>()
        .join(",")
}

fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::catalog::Source;

    #[test]
    fn csv_row_joins_slots() {
        let t = TemplateInfo {
            name: "e2e-test".into(),
            path: "test/e2e/e2e_test.go".into(),
            slots: vec!["Boilerplate".into(), "Repo".into()],
            source: Source::Builtin,
        };
        assert_eq!(csv_row(&t), "e2e-test,test/e2e/e2e_test.go,Boilerplate;Repo,builtin");
    }

    #[test]
    fn csv_field_quotes_commas() {
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_field("plain"), "plain");
    }
}
