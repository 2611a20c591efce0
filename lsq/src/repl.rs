use anyhow::{Context, Result, bail};
use memex_search::{DateContext, SearchFilterSet};
use query_syntax::{
    FilterDetail, QueryPart, construct_query_string, get_cursor_position_filter_type,
    get_filter_mapping_from_key, parse_search_query, push_filter_key_to_query_string,
    remove_empty_filter_strings_from_query_string, update_filters_in_query_string,
};
use std::fmt::Write;
use tracing::debug;

#[derive(Debug, PartialEq)]
enum Command<'a> {
    Show,
    Replace(&'a str),
    Push(&'a str),
    Set { key: &'a str, values: Vec<String> },
    Remove(&'a str),
    Cursor(usize),
    Filters,
    Bye,
}

impl<'a> Command<'a> {
    fn parse(line: &'a str) -> Result<Self> {
        if line.is_empty() {
            return Ok(Self::Show);
        }
        let Some(command) = line.strip_prefix('/') else {
            return Ok(Self::Replace(line));
        };
        let (name, rest) = command.split_once(' ').unwrap_or((command, ""));
        let rest = rest.trim();
        Ok(match name {
            "bye" => Self::Bye,
            "filters" => Self::Filters,
            "push" => Self::Push(required(rest, "/push <key>")?),
            "remove" => Self::Remove(required(rest, "/remove <key>")?),
            "cursor" => Self::Cursor(
                required(rest, "/cursor <n>")?
                    .parse()
                    .with_context(|| format!("Invalid cursor position: {rest}"))?,
            ),
            "set" => {
                let (key, values) = rest.split_once(' ').unwrap_or((rest, ""));
                let values = values
                    .split(',')
                    .map(str::trim)
                    .filter(|value| !value.is_empty())
                    .map(str::to_string)
                    .collect();
                Self::Set {
                    key: required(key, "/set <key> <v1,v2,...>")?,
                    values,
                }
            }
            _ => bail!("Unknown command: /{name}"),
        })
    }
}

fn required<'a>(arg: &'a str, usage: &str) -> Result<&'a str> {
    if arg.is_empty() {
        bail!("Usage: {usage}");
    }
    Ok(arg)
}

fn detail_for_key(key: &str) -> Result<FilterDetail> {
    get_filter_mapping_from_key(key)
        .map(|mapping| mapping.detail())
        .with_context(|| format!("Unknown filter key: {key}"))
}

pub enum Outcome {
    Print(String),
    Exit,
}

/// Search-bar state edited one line at a time.
pub struct Session {
    query: String,
    context: DateContext,
    json: bool,
}

impl Session {
    pub fn new(query: String, context: DateContext, json: bool) -> Self {
        Self {
            query,
            context,
            json,
        }
    }

    pub fn run(&mut self, line: &str) -> Result<Outcome> {
        let command = Command::parse(line)?;
        debug!(?command, "Running command");
        match command {
            Command::Bye => return Ok(Outcome::Exit),
            Command::Show => {}
            Command::Replace(query) => self.query = query.to_string(),
            Command::Push(key) => {
                let detail = detail_for_key(key)?;
                self.query = push_filter_key_to_query_string(&detail, &self.query)
                    .with_context(|| format!("Failed to push {key}"))?;
            }
            Command::Set { key, values } => {
                let detail = detail_for_key(key)?.with_filters(values);
                self.query = update_filters_in_query_string(&detail, &self.query)
                    .with_context(|| format!("No {key}: filter to update"))?;
            }
            Command::Remove(key) => {
                let detail = detail_for_key(key)?;
                self.query = remove_empty_filter_strings_from_query_string(&detail, &self.query);
            }
            Command::Cursor(cursor) => {
                let found = get_cursor_position_filter_type(&self.query, cursor);
                return Ok(Outcome::Print(match found {
                    Some(filter_type) => format!("{filter_type:?}"),
                    None => "none".to_string(),
                }));
            }
            Command::Filters => {
                let set = SearchFilterSet::parse(&self.query, &self.context)?;
                let out = if self.json {
                    serde_json::to_string_pretty(&set).context("Failed to encode filter set")?
                } else {
                    format!("{set:#?}")
                };
                return Ok(Outcome::Print(out));
            }
        }
        self.render().map(Outcome::Print)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    fn render(&self) -> Result<String> {
        let parts = parse_search_query(&self.query);
        if self.json {
            return serde_json::to_string_pretty(&parts).context("Failed to encode parts");
        }
        let mut out = String::new();
        for (i, part) in parts.iter().enumerate() {
            let span = format!("{}..={}", part.start_index(), part.end_index());
            match part {
                QueryPart::SearchString { value, .. } => {
                    writeln!(out, "[{i}] text   {span:<10} {value:?}")?;
                }
                QueryPart::Filter { detail, .. } => {
                    let key = detail.key().unwrap_or("?");
                    write!(out, "[{i}] {key:<6} {span:<10} {}", detail.filters.join(", "))?;
                    if let Some(query) = &detail.query {
                        write!(out, " (typing {query:?})")?;
                    }
                    out.push('\n');
                }
            }
        }
        write!(out, "=> {}", construct_query_string(&parts))?;
        Ok(out)
    }
}
