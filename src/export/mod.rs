use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::fs;

use crate::menu::{Menus, Week};
use crate::parse::Location;

/// Writes parsed menus as JSON files below one output directory.
#[derive(Debug, Clone)]
pub struct JsonStore(PathBuf);

#[derive(Serialize)]
struct Combined<'a> {
    canteen_id: String,
    weeks: Vec<Week<'a>>,
}

impl JsonStore {
    pub fn open(p: impl AsRef<Path>) -> Self {
        Self(p.as_ref().to_owned())
    }

    pub fn root(&self) -> &Path {
        &self.0
    }

    fn location_dir(&self, location: Location) -> PathBuf {
        self.0.join(location.alias())
    }

    /// One file per ISO week: `<out>/<location>/<year>/<week>.json`. Returns the written paths.
    pub async fn save_weeks(&self, location: Location, menus: &Menus) -> crate::Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for week in Week::to_weeks(menus).into_values() {
            let dir = self.location_dir(location).join(week.year().to_string());
            let path = dir.join(format!("{:02}.json", week.calendar_week()));
            write_json(&dir, &path, &week).await?;
            written.push(path);
        }
        log::debug!("Wrote {} weeks of {location}", written.len());
        Ok(written)
    }

    /// All weeks of a location in `<out>/<location>/combined/combined.json`.
    pub async fn save_combined(&self, location: Location, menus: &Menus) -> crate::Result<PathBuf> {
        let combined = Combined {
            canteen_id: location.alias().to_string(),
            weeks: Week::to_weeks(menus).into_values().collect(),
        };
        let dir = self.location_dir(location).join("combined");
        let path = dir.join("combined.json");
        write_json(&dir, &path, &combined).await?;
        Ok(path)
    }
}

async fn write_json<T: Serialize>(dir: &Path, path: &Path, value: &T) -> crate::Result<()> {
    fs::create_dir_all(dir).await?;
    let bytes = serde_json::to_vec_pretty(value)?;
    fs::write(path, bytes).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::{json, Value};

    use super::*;
    use crate::menu::{Dish, Eur, IngredientScope, Ingredients, Menu, Price, Prices};

    fn out_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("mensa_menu-{name}-{}", std::process::id()))
    }

    fn menus() -> Menus {
        [(2018, 11, 9), (2018, 11, 12)]
            .into_iter()
            .map(|(y, m, d)| {
                let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
                let dish = Dish::new(
                    "Gemüsecurry",
                    Prices::flat(Price::new(Eur::from_cents(350))),
                    Ingredients::new(IngredientScope::Studentenwerk).parsed("Gl,Mi"),
                    "Tagesgericht 1",
                );
                (date, Menu::new(date, vec![dish]))
            })
            .collect()
    }

    async fn read(path: &Path) -> Value {
        serde_json::from_slice(&fs::read(path).await.unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_save_weeks() {
        let store = JsonStore::open(out_dir("weeks"));
        let written = store.save_weeks(Location::IppBistro, &menus()).await.unwrap();
        assert_eq!(
            written,
            vec![
                store.root().join("ipp-bistro/2018/45.json"),
                store.root().join("ipp-bistro/2018/46.json"),
            ]
        );
        let week = read(&written[0]).await;
        assert_eq!(week["number"], json!(45));
        assert_eq!(week["year"], json!(2018));
        assert_eq!(week["days"][0]["date"], json!("2018-11-09"));
        assert_eq!(week["days"][0]["dishes"][0]["name"], json!("Gemüsecurry"));
        fs::remove_dir_all(store.root()).await.unwrap();
    }

    #[tokio::test]
    async fn test_save_combined() {
        let store = JsonStore::open(out_dir("combined"));
        let path = store.save_combined(Location::FmiBistro, &menus()).await.unwrap();
        assert_eq!(path, store.root().join("fmi-bistro/combined/combined.json"));
        let combined = read(&path).await;
        assert_eq!(combined["canteen_id"], json!("fmi-bistro"));
        assert_eq!(combined["weeks"].as_array().map(Vec::len), Some(2));
        assert_eq!(combined["weeks"][1]["number"], json!(46));
        fs::remove_dir_all(store.root()).await.unwrap();
    }
}
