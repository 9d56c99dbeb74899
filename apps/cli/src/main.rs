#![deny(warnings)]

//! Headless CLI: price a crop for a day and negotiate an offer against it.

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use mandi_core::{
    load_config, validate_offer_input, CropCatalog, CropRecord, DailyPriceSample, MandiConfig,
    NegotiationOutcome, Offer,
};
use mandi_locale::{Language, Phrasebook};
use mandi_negotiation::Negotiator;
use mandi_pricing::PriceSimulator;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: mandi [--crop NAME] [--offer N] [--date YYYY-MM-DD] [--lang CODE] \
[--config FILE] [--json] [--version]";

#[derive(Debug, Default, PartialEq)]
struct Args {
    crop: Option<String>,
    offer: Option<i64>,
    date: Option<NaiveDate>,
    lang: Option<String>,
    config: Option<PathBuf>,
    json: bool,
    version: bool,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Args> {
    let mut out = Args::default();
    let mut it = args.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--crop" => out.crop = Some(it.next().context("--crop needs a value")?),
            "--offer" => {
                let v = it.next().context("--offer needs a value")?;
                out.offer = Some(v.parse().with_context(|| format!("bad offer: {v}"))?);
            }
            "--date" => {
                let v = it.next().context("--date needs a value")?;
                out.date = Some(
                    NaiveDate::parse_from_str(&v, "%Y-%m-%d")
                        .with_context(|| format!("bad date: {v}"))?,
                );
            }
            "--lang" => out.lang = Some(it.next().context("--lang needs a value")?),
            "--config" => out.config = Some(it.next().context("--config needs a value")?.into()),
            "--json" => out.json = true,
            "--version" => out.version = true,
            other => bail!("unknown argument: {other}\n{USAGE}"),
        }
    }
    Ok(out)
}

/// Everything shown for one crop on one day.
#[derive(Debug, Serialize)]
struct Report {
    language: Language,
    crop: CropRecord,
    today: DailyPriceSample,
    forecast: DailyPriceSample,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<NegotiationOutcome>,
}

struct Market {
    catalog: CropCatalog,
    pricing: PriceSimulator,
    negotiator: Negotiator,
}

impl Market {
    fn from_config(cfg: &MandiConfig) -> Result<Self> {
        Ok(Self {
            catalog: cfg.catalog()?,
            pricing: PriceSimulator::new(cfg.pricing.clone())?,
            negotiator: Negotiator::new(&cfg.negotiation)?,
        })
    }

    fn report(
        &self,
        language: Language,
        query: &str,
        date: NaiveDate,
        offer: Option<i64>,
    ) -> Result<Report> {
        let crop = self.catalog.find(query)?.clone();
        let today = self.pricing.daily_sample(&crop, date)?;
        let forecast = self.pricing.forecast_next(&crop, date)?;
        let outcome = match offer {
            Some(price) => {
                let offer = Offer {
                    crop: crop.name.clone(),
                    buyer_price: validate_offer_input(price)?,
                    market_price: today.current_price,
                };
                Some(self.negotiator.evaluate(&offer)?)
            }
            None => None,
        };
        Ok(Report {
            language,
            crop,
            today,
            forecast,
            outcome,
        })
    }

    fn board(&self, date: NaiveDate) -> Result<Vec<DailyPriceSample>> {
        self.catalog
            .iter()
            .map(|c| {
                self.pricing
                    .daily_sample(c, date)
                    .map_err(anyhow::Error::from)
            })
            .collect()
    }
}

fn resolve_language(arg: Option<&str>, cfg: &MandiConfig) -> Language {
    let requested = arg.or(cfg.default_language.as_deref()).unwrap_or("en");
    requested.parse().unwrap_or_else(|e| {
        warn!(%e, "falling back to English");
        Language::English
    })
}

fn render(book: &Phrasebook, r: &Report) -> String {
    let lang = r.language;
    let mut lines = vec![
        book.text(lang, "title").to_string(),
        format!(
            "{}: ₹{}/kg | Trend: {} | Demand: {}",
            book.text(lang, "market_rate"),
            r.today.current_price,
            r.today.trend,
            r.crop
                .demand
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".into())
        ),
        format!(
            "{} ({}) | base ₹{}/kg | forecast {}: ₹{}/kg ({})",
            r.crop.name,
            r.today.date,
            r.crop.base_price,
            r.forecast.date,
            r.forecast.current_price,
            r.forecast.trend
        ),
    ];
    if let Some(o) = &r.outcome {
        lines.push(book.text(lang, "negotiate").to_string());
        let headline = if o.decision.is_accepted() {
            "offer_accepted"
        } else {
            "offer_rejected"
        };
        lines.push(book.text(lang, headline).to_string());
        lines.push(o.message.clone());
    }
    lines.join("\n")
}

fn main() -> Result<()> {
    // Logging setup
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args(std::env::args().skip(1))?;
    if args.version {
        println!("mandi {} ({})", env!("CARGO_PKG_VERSION"), env!("GIT_SHA"));
        return Ok(());
    }
    info!(crop = ?args.crop, offer = ?args.offer, date = ?args.date, "starting CLI");

    let cfg = match &args.config {
        Some(path) => load_config(path).with_context(|| format!("loading {}", path.display()))?,
        None => MandiConfig::default(),
    };
    let market = Market::from_config(&cfg)?;
    let language = resolve_language(args.lang.as_deref(), &cfg);
    let book = Phrasebook::builtin();
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());

    let Some(query) = args.crop.as_deref() else {
        let board = market.board(date)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&board)?);
        } else {
            println!("{}", book.text(language, "ask_crop"));
            for s in board {
                println!("  {:<12} ₹{:>4}/kg  {}", s.crop, s.current_price, s.trend);
            }
        }
        return Ok(());
    };

    let report = market.report(language, query, date, args.offer)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", render(&book, &report));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mandi_core::Decision;

    fn argv(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    #[test]
    fn parses_all_flags() {
        let a = parse_args(argv(
            "--crop Okra --offer 35 --date 2026-10-17 --lang hi --config x.yaml --json",
        ))
        .unwrap();
        assert_eq!(a.crop.as_deref(), Some("Okra"));
        assert_eq!(a.offer, Some(35));
        assert_eq!(a.date, Some(day()));
        assert_eq!(a.lang.as_deref(), Some("hi"));
        assert_eq!(a.config, Some(PathBuf::from("x.yaml")));
        assert!(a.json && !a.version);
        assert_eq!(parse_args(Vec::new()).unwrap(), Args::default());
    }

    #[test]
    fn rejects_bad_flags() {
        assert!(parse_args(argv("--offer lots")).is_err());
        assert!(parse_args(argv("--date 17/10/2026")).is_err());
        assert!(parse_args(argv("--crop")).is_err());
        assert!(parse_args(argv("--verbose")).is_err());
    }

    #[test]
    fn report_settles_at_market_price() {
        let market = Market::from_config(&MandiConfig::default()).unwrap();
        let probe = market.report(Language::English, "tomato", day(), None).unwrap();
        let market_price = probe.today.current_price;
        let r = market
            .report(Language::English, "tomato", day(), Some(market_price))
            .unwrap();
        let o = r.outcome.unwrap();
        assert_eq!(o.decision, Decision::Accept);
        assert_eq!(o.settled_or_counter_price, market_price);
        assert_eq!(r.crop.name, "Tomato");
        assert_eq!(r.forecast.date, day().succ_opt().unwrap());
    }

    #[test]
    fn report_rejects_out_of_range_offer_and_unknown_crop() {
        let market = Market::from_config(&MandiConfig::default()).unwrap();
        assert!(market
            .report(Language::English, "Okra", day(), Some(500))
            .is_err());
        assert!(market.report(Language::English, "mango", day(), None).is_err());
    }

    #[test]
    fn render_uses_localized_headline() {
        let market = Market::from_config(&MandiConfig::default()).unwrap();
        let book = Phrasebook::builtin();
        let r = market.report(Language::Hindi, "Garlic", day(), Some(1)).unwrap();
        let text = render(&book, &r);
        assert!(text.contains("माफ कीजिये, भाव बहुत कम है।"));
        assert!(text.contains("Too low."));
        assert!(text.contains("बाजार भाव: ₹"));
    }

    #[test]
    fn language_resolution_order() {
        let mut cfg = MandiConfig::default();
        assert_eq!(resolve_language(None, &cfg), Language::English);
        cfg.default_language = Some("pb".into());
        assert_eq!(resolve_language(None, &cfg), Language::Punjabi);
        assert_eq!(resolve_language(Some("Hindi (hi)"), &cfg), Language::Hindi);
        assert_eq!(resolve_language(Some("xx"), &cfg), Language::English);
    }

    #[test]
    fn board_covers_catalog() {
        let market = Market::from_config(&MandiConfig::default()).unwrap();
        assert_eq!(market.board(day()).unwrap().len(), 15);
    }
}
