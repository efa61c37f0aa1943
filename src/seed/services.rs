use std::collections::HashMap;

use anyhow::Context;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info};

use super::swapi::{SwapiClient, SwapiPerson};
use crate::catalog::repo_types::{NewCharacter, NewPlanet};
use crate::config::SeedUserConfig;
use crate::store::Store;
use crate::users::repo_types::{NewUser, User};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub planets: usize,
    pub characters: usize,
    pub user: Option<i32>,
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub async fn seed_planets(client: &SwapiClient, store: &dyn Store) -> anyhow::Result<usize> {
    info!("seeding planets");
    let planets = client.planets().await.context("fetch planets")?;
    let total = planets.len();
    for p in planets {
        let stored = store
            .upsert_planet(NewPlanet {
                name: p.name,
                climate: p.climate,
                terrain: p.terrain,
                population: p.population,
            })
            .await
            .context("upsert planet")?;
        debug!(id = stored.id, name = %stored.name, "planet stored");
    }
    info!(count = total, "planets seeded");
    Ok(total)
}

pub async fn seed_characters(client: &SwapiClient, store: &dyn Store) -> anyhow::Result<usize> {
    info!("seeding characters");
    let people = client.people().await.context("fetch people")?;
    let total = people.len();
    let mut names = NameCache::default();
    for person in people {
        let new = resolve_character(client, &mut names, person).await?;
        let stored = store
            .upsert_character(new)
            .await
            .context("upsert character")?;
        debug!(id = stored.id, name = %stored.name, "character stored");
    }
    info!(count = total, "characters seeded");
    Ok(total)
}

/// Homeworld and species names by catalog URL, shared across one run.
#[derive(Default)]
struct NameCache(HashMap<String, Option<String>>);

impl NameCache {
    async fn name_of(&mut self, client: &SwapiClient, url: &str) -> anyhow::Result<Option<String>> {
        if let Some(hit) = self.0.get(url) {
            return Ok(hit.clone());
        }
        let name = client.fetch_name(url).await?;
        self.0.insert(url.to_string(), name.clone());
        Ok(name)
    }
}

async fn resolve_character(
    client: &SwapiClient,
    names: &mut NameCache,
    person: SwapiPerson,
) -> anyhow::Result<NewCharacter> {
    let homeworld = match person.homeworld.as_deref() {
        Some(url) => names
            .name_of(client, url)
            .await
            .with_context(|| format!("homeworld of {}", person.name))?,
        None => None,
    };
    let species = match person.species.first() {
        Some(url) => names
            .name_of(client, url)
            .await
            .with_context(|| format!("species of {}", person.name))?,
        None => None,
    };
    Ok(NewCharacter {
        name: person.name,
        species,
        homeworld,
        description: None,
    })
}

/// Existing user with that email, or a freshly inserted one.
pub async fn seed_user(store: &dyn Store, cfg: &SeedUserConfig) -> anyhow::Result<User> {
    let email = cfg.email.trim().to_lowercase();
    anyhow::ensure!(is_valid_email(&email), "invalid seed user email: {}", cfg.email);

    if let Some(existing) = store.find_user_by_email(&email).await? {
        info!(user_id = existing.id, %email, "seed user already present");
        return Ok(existing);
    }

    let user = store
        .insert_user(NewUser {
            email,
            password: cfg.password.clone(),
            first_name: cfg.first_name.clone(),
            last_name: cfg.last_name.clone(),
        })
        .await
        .context("insert seed user")?;
    info!(user_id = user.id, email = %user.email, "seed user created");
    Ok(user)
}

pub async fn run(
    client: &SwapiClient,
    store: &dyn Store,
    seed_user_cfg: Option<&SeedUserConfig>,
) -> anyhow::Result<SeedReport> {
    let user = match seed_user_cfg {
        Some(cfg) => Some(seed_user(store, cfg).await?.id),
        None => None,
    };
    let planets = seed_planets(client, store).await?;
    let characters = seed_characters(client, store).await?;
    Ok(SeedReport {
        planets,
        characters,
        user,
    })
}
