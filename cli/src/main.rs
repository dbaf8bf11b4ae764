//! gaia-cli: command-line client for the Gaia country information service

mod client;

use clap::{Parser, Subcommand, ValueEnum};
use client::GaiaClient;
use comfy_table::{ContentArrangement, Table};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "gaia-cli", about = "Gaia country information CLI", version)]
struct Cli {
    /// Server URL
    #[arg(long, default_value = "http://localhost:5000", global = true, env = "GAIA_URL")]
    url: String,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Search countries by name prefix
    Search {
        /// Search term
        term: String,
    },
    /// Show the merged record for a country
    Country {
        /// ISO 3166-1 alpha-3 code
        code: String,
    },
    /// Get (or generate) the summary for a country
    Summary {
        /// Country name
        country: String,
    },
    /// List all countries
    List,
    /// Show server status
    Status,
}

type CmdResult = Result<(), Box<dyn std::error::Error>>;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let client = GaiaClient::new(&cli.url);

    let result = match cli.command {
        Commands::Search { term } => run_search(&client, &term, &cli.format).await,
        Commands::Country { code } => run_country(&client, &code, &cli.format).await,
        Commands::Summary { country } => run_summary(&client, &country, &cli.format).await,
        Commands::List => run_list(&client, &cli.format).await,
        Commands::Status => run_status(&client, &cli.format).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn print_json(data: &Value) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

fn print_hits(data: &Value) {
    let hits = data.as_array().map(Vec::as_slice).unwrap_or_default();
    let mut table = new_table(vec!["Code", "Name", "Official name"]);
    for hit in hits {
        table.add_row(vec![
            format_table_value(&hit["code"]),
            format_table_value(&hit["displayName"]),
            format_table_value(&hit["officialName"]),
        ]);
    }
    println!("{table}");
    println!("{} countries", hits.len());
}

async fn run_search(client: &GaiaClient, term: &str, format: &OutputFormat) -> CmdResult {
    let data = client.search(term).await?;
    match format {
        OutputFormat::Json => print_json(&data)?,
        OutputFormat::Table => print_hits(&data),
    }
    Ok(())
}

async fn run_list(client: &GaiaClient, format: &OutputFormat) -> CmdResult {
    let data = client.list().await?;
    match format {
        OutputFormat::Json => print_json(&data)?,
        OutputFormat::Table => print_hits(&data),
    }
    Ok(())
}

async fn run_country(client: &GaiaClient, code: &str, format: &OutputFormat) -> CmdResult {
    let data = client.country(code).await?;
    if let OutputFormat::Json = format {
        return print_json(&data);
    }

    let mut table = new_table(vec!["Field", "Value"]);
    let rows = [
        ("Name", &data["name"]["common"]),
        ("Official name", &data["name"]["official"]),
        ("Code", &data["cca3"]),
        ("Capital", &data["capital"]),
        ("Region", &data["region"]),
        ("Subregion", &data["subregion"]),
        ("Population", &data["population"]),
        ("Area (km²)", &data["area"]),
        ("Languages", &data["languages"]),
        ("Borders", &data["borders"]),
        ("Timezones", &data["timezones"]),
    ];
    for (label, value) in rows {
        table.add_row(vec![label.to_string(), format_table_value(value)]);
    }

    if let Some(knowledge) = data.get("knowledge").and_then(Value::as_object) {
        let labels = [
            ("hdi", "HDI"),
            ("gdpPerCapita", "GDP per capita"),
            ("lifeExpectancy", "Life expectancy"),
            ("literacyRate", "Literacy rate"),
            ("governmentType", "Government"),
            ("religions", "Religions"),
            ("ethnicGroups", "Ethnic groups"),
        ];
        for (key, label) in labels {
            if let Some(value) = knowledge.get(key) {
                table.add_row(vec![label.to_string(), format_table_value(value)]);
            }
        }
        if let Some(images) = knowledge.get("images").and_then(Value::as_array) {
            table.add_row(vec!["Images".to_string(), images.len().to_string()]);
        }
    }

    println!("{table}");
    Ok(())
}

async fn run_summary(client: &GaiaClient, country: &str, format: &OutputFormat) -> CmdResult {
    let data = client.summary(country).await?;
    match format {
        OutputFormat::Json => print_json(&data)?,
        OutputFormat::Table => {
            let cached = data["fromCache"].as_bool().unwrap_or(false);
            println!(
                "{}{}",
                format_table_value(&data["country"]),
                if cached { " (cached)" } else { "" }
            );
            println!();
            println!("{}", data["summary"].as_str().unwrap_or_default());
        }
    }
    Ok(())
}

async fn run_status(client: &GaiaClient, format: &OutputFormat) -> CmdResult {
    let data = client.status().await?;
    match format {
        OutputFormat::Json => print_json(&data)?,
        OutputFormat::Table => {
            println!("Server:  {}", format_table_value(&data["service"]));
            println!("Status:  {}", format_table_value(&data["status"]));
            println!("Version: {}", format_table_value(&data["version"]));
        }
    }
    Ok(())
}

fn format_table_value(val: &Value) -> String {
    match val {
        Value::Null => "".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items
            .iter()
            .map(format_table_value)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(map) => map
            .values()
            .map(format_table_value)
            .collect::<Vec<_>>()
            .join(", "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_table_value() {
        assert_eq!(format_table_value(&Value::Null), "");
        assert_eq!(format_table_value(&json!("Berlin")), "Berlin");
        assert_eq!(format_table_value(&json!(["Berlin", "Bonn"])), "Berlin, Bonn");
        assert_eq!(format_table_value(&json!({"deu": "German"})), "German");
        assert_eq!(format_table_value(&json!(83_240_525)), "83240525");
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["gaia-cli", "--format", "json", "country", "deu"]).unwrap();
        assert!(matches!(cli.format, OutputFormat::Json));
        assert!(matches!(cli.command, Commands::Country { ref code } if code == "deu"));
    }
}
