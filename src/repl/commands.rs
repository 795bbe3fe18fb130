//! REPL Commands
//!
//! The command table and the per-session state the commands act on.

use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use rand::Rng;

use crate::cache::ResponseCache;
use crate::fetch::{get_cached_or_fetch, Fetcher};
use crate::models::{LocationAreaDetail, LocationAreaPage, Pokemon};

/// Catch rolls are drawn uniformly from `0..MAX_CATCH_ROLL`
pub const MAX_CATCH_ROLL: u32 = 500;

// == Command ==
/// A command the REPL understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    Exit,
    Map,
    Mapb,
    Explore,
    Catch,
    Inspect,
    Pokedex,
}

impl Command {
    /// Every command, in the order `help` lists them.
    pub const ALL: [Command; 8] = [
        Command::Help,
        Command::Exit,
        Command::Map,
        Command::Mapb,
        Command::Explore,
        Command::Catch,
        Command::Inspect,
        Command::Pokedex,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Command::Help => "help",
            Command::Exit => "exit",
            Command::Map => "map",
            Command::Mapb => "mapb",
            Command::Explore => "explore",
            Command::Catch => "catch",
            Command::Inspect => "inspect",
            Command::Pokedex => "pokedex",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Command::Help => "Displays a help message",
            Command::Exit => "Exit the Pokedex",
            Command::Map => "Lists the next 20 location areas",
            Command::Mapb => "Lists the previous 20 location areas",
            Command::Explore => "Lists the Pokemon that can be encountered in an area",
            Command::Catch => "Attempts to catch a Pokemon",
            Command::Inspect => "Shows details of a caught Pokemon",
            Command::Pokedex => "Lists all caught Pokemon",
        }
    }

    /// Looks a command up by its (already lowercased) name.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|command| command.name() == name)
    }
}

/// Whether the REPL should keep reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// A throw succeeds when the roll reaches the Pokemon's base experience.
pub fn catch_succeeds(roll: u32, base_experience: u32) -> bool {
    roll >= base_experience
}

/// Area and Pokemon names are used as a single URL path segment, so only
/// ASCII letters, digits and dashes are accepted.
pub fn is_valid_resource_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

// == Session ==
/// State carried between commands: map paging and the caught Pokemon.
pub struct Session {
    cache: Arc<ResponseCache>,
    fetcher: Arc<dyn Fetcher>,
    base_url: String,
    next: Option<String>,
    previous: Option<String>,
    pokedex: BTreeMap<String, Pokemon>,
}

impl Session {
    /// Creates a session positioned before the first location page.
    ///
    /// `base_url` is the API root without a trailing slash.
    pub fn new(cache: Arc<ResponseCache>, fetcher: Arc<dyn Fetcher>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        let first_page = first_page_url(&base_url);

        Self {
            cache,
            fetcher,
            base_url,
            next: Some(first_page),
            previous: None,
            pokedex: BTreeMap::new(),
        }
    }

    /// URL `map` will load next, if any.
    pub fn next_page(&self) -> Option<&str> {
        self.next.as_deref()
    }

    /// URL `mapb` will load next, if any.
    pub fn previous_page(&self) -> Option<&str> {
        self.previous.as_deref()
    }

    /// Caught Pokemon by name.
    pub fn pokedex(&self) -> &BTreeMap<String, Pokemon> {
        &self.pokedex
    }

    // == Execute ==
    /// Runs one command, writing its output to `out`.
    pub async fn execute<W: Write>(
        &mut self,
        command: Command,
        args: &[String],
        out: &mut W,
    ) -> anyhow::Result<Flow> {
        match command {
            Command::Help => self.help(out)?,
            Command::Exit => {
                writeln!(out, "Closing the Pokedex... Goodbye!")?;
                return Ok(Flow::Exit);
            }
            Command::Map => {
                // Past the last page, paging starts over
                let url = self.next.clone().unwrap_or_else(|| first_page_url(&self.base_url));
                self.show_page(&url, out).await?
            }
            Command::Mapb => match self.previous.clone() {
                Some(url) => self.show_page(&url, out).await?,
                None => writeln!(out, "You're on the first page")?,
            },
            Command::Explore => match args.first() {
                Some(area) if !is_valid_resource_name(area) => {
                    writeln!(out, "Invalid area name: {}", area)?
                }
                Some(area) => self.explore(area, out).await?,
                None => writeln!(out, "Please provide an area name with the explore command")?,
            },
            Command::Catch => match args.first() {
                Some(name) if !is_valid_resource_name(name) => {
                    writeln!(out, "Invalid Pokemon name: {}", name)?
                }
                Some(name) => self.catch(name, out).await?,
                None => writeln!(out, "Please provide a Pokemon name with the catch command")?,
            },
            Command::Inspect => match args.first() {
                Some(name) => self.inspect(name, out)?,
                None => writeln!(out, "Please provide a Pokemon name with the inspect command")?,
            },
            Command::Pokedex => self.list_pokedex(out)?,
        }
        Ok(Flow::Continue)
    }

    fn help<W: Write>(&self, out: &mut W) -> anyhow::Result<()> {
        writeln!(out, "Welcome to the Pokedex!")?;
        writeln!(out, "Usage:")?;
        writeln!(out)?;
        for command in Command::ALL {
            writeln!(out, "{}: {}", command.name(), command.description())?;
        }
        Ok(())
    }

    async fn show_page<W: Write>(&mut self, url: &str, out: &mut W) -> anyhow::Result<()> {
        let page: LocationAreaPage = get_cached_or_fetch(&self.cache, self.fetcher.as_ref(), url)
            .await
            .context("could not load location areas")?;

        self.next = page.next;
        self.previous = page.previous;

        for area in &page.results {
            writeln!(out, "{}", area.name)?;
        }
        Ok(())
    }

    async fn explore<W: Write>(&self, area: &str, out: &mut W) -> anyhow::Result<()> {
        let url = format!("{}/location-area/{}", self.base_url, area);
        let detail: LocationAreaDetail = get_cached_or_fetch(&self.cache, self.fetcher.as_ref(), &url)
            .await
            .with_context(|| format!("could not explore {}", area))?;

        writeln!(out, "Exploring {}", area)?;
        writeln!(out, "Found Pokemon:")?;
        for encounter in &detail.pokemon_encounters {
            writeln!(out, "- {}", encounter.pokemon.name)?;
        }
        Ok(())
    }

    async fn catch<W: Write>(&mut self, name: &str, out: &mut W) -> anyhow::Result<()> {
        let url = format!("{}/pokemon/{}", self.base_url, name);
        let pokemon: Pokemon = get_cached_or_fetch(&self.cache, self.fetcher.as_ref(), &url)
            .await
            .with_context(|| format!("could not find {}", name))?;

        writeln!(out, "Throwing a Pokeball at {}...", pokemon.name)?;

        let roll = rand::thread_rng().gen_range(0..MAX_CATCH_ROLL);
        if catch_succeeds(roll, pokemon.base_experience.unwrap_or(0)) {
            writeln!(out, "{} was caught!", pokemon.name)?;
            writeln!(out, "You may now inspect it with the inspect command.")?;
            self.pokedex.insert(pokemon.name.clone(), pokemon);
        } else {
            writeln!(out, "{} escaped!", pokemon.name)?;
        }
        Ok(())
    }

    fn inspect<W: Write>(&self, name: &str, out: &mut W) -> anyhow::Result<()> {
        let Some(pokemon) = self.pokedex.get(name) else {
            writeln!(out, "You have not caught that Pokemon")?;
            return Ok(());
        };

        writeln!(out, "Name: {}", pokemon.name)?;
        writeln!(out, "Height: {}", pokemon.height)?;
        writeln!(out, "Weight: {}", pokemon.weight)?;
        writeln!(out, "Stats:")?;
        for stat in &pokemon.stats {
            writeln!(out, "-{}: {}", stat.stat.name, stat.base_stat)?;
        }
        writeln!(out, "Types:")?;
        for kind in &pokemon.types {
            writeln!(out, "- {}", kind.kind.name)?;
        }
        Ok(())
    }

    fn list_pokedex<W: Write>(&self, out: &mut W) -> anyhow::Result<()> {
        if self.pokedex.is_empty() {
            writeln!(out, "Your Pokedex is empty. Try the catch command first.")?;
            return Ok(());
        }

        writeln!(out, "Your Pokedex:")?;
        for name in self.pokedex.keys() {
            writeln!(out, "- {}", name)?;
        }
        Ok(())
    }
}

fn first_page_url(base_url: &str) -> String {
    format!("{}/location-area/", base_url)
}
