use crate::session::{
    DEFAULT_CURRENCY,
    DEFAULT_PAYMENT_RAIL,
    DEMO_STARTING_BALANCE,
    Rules,
    SETTLEMENT_DELAY_MINUTES,
    WELCOME_BONUS,
};
use color_eyre::eyre::{
    Result,
    WrapErr,
    eyre,
};
use serde::{
    Deserialize,
    Serialize,
};
use std::{
    fs,
    path::{
        Path,
        PathBuf,
    },
};

pub const DEFAULT_MIN_AMOUNT: u64 = 100;
pub const DEFAULT_DEPOSIT_PRESETS: [u64; 3] = [1_000, 5_000, 10_000];
pub const DEFAULT_TOAST_SECONDS: u64 = 5;
pub const DEFAULT_LOG_DIR: &str = ".kerzh/logs";

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub demo_balance: u64,
    pub welcome_bonus: u64,
    pub min_amount: u64,
    pub deposit_presets: Vec<u64>,
    pub currency: String,
    pub payment_rail: String,
    pub settlement_delay_minutes: u32,
    pub toast_seconds: u64,
    pub log_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            demo_balance: DEMO_STARTING_BALANCE,
            welcome_bonus: WELCOME_BONUS,
            min_amount: DEFAULT_MIN_AMOUNT,
            deposit_presets: DEFAULT_DEPOSIT_PRESETS.to_vec(),
            currency: DEFAULT_CURRENCY.to_string(),
            payment_rail: DEFAULT_PAYMENT_RAIL.to_string(),
            settlement_delay_minutes: SETTLEMENT_DELAY_MINUTES,
            toast_seconds: DEFAULT_TOAST_SECONDS,
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
        }
    }
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path).wrap_err_with(|| {
            format!("Failed to read config file {}", path.display())
        })?;
        Self::from_json(&data)
            .wrap_err_with(|| format!("Invalid config file {}", path.display()))
    }

    /// Missing fields fall back to their defaults.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        let mut config = serde_json::from_slice::<AppConfig>(data)
            .wrap_err("Failed to parse config JSON")?;
        config.log_dir = expand_path(&config.log_dir.to_string_lossy());
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_amount == 0 {
            return Err(eyre!("min_amount must be at least 1"));
        }
        if let Some(p) = self.deposit_presets.iter().find(|p| **p < self.min_amount) {
            return Err(eyre!(
                "deposit preset {p} is below min_amount {}",
                self.min_amount
            ));
        }
        if self.payment_rail.trim().is_empty() {
            return Err(eyre!("payment_rail must not be empty"));
        }
        Ok(())
    }

    pub fn rules(&self) -> Rules {
        Rules {
            demo_balance: self.demo_balance,
            welcome_bonus: self.welcome_bonus,
            settlement_delay_minutes: self.settlement_delay_minutes,
            currency: self.currency.clone(),
            payment_rail: self.payment_rail.clone(),
        }
    }

    pub fn to_pretty_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).wrap_err("Failed to serialize config")
    }
}

pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).into_owned())
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;

    #[test]
    fn default__matches_fixed_rules() {
        let rules = AppConfig::default().rules();
        assert_eq!(Rules::default(), rules);
    }

    #[test]
    fn from_json__fills_missing_fields_with_defaults() {
        let config =
            AppConfig::from_json(br#"{ "welcome_bonus": 20000, "currency": "EUR" }"#)
                .unwrap();
        assert_eq!(20_000, config.welcome_bonus);
        assert_eq!("EUR", config.currency);
        assert_eq!(DEMO_STARTING_BALANCE, config.demo_balance);
        assert_eq!(DEFAULT_DEPOSIT_PRESETS.to_vec(), config.deposit_presets);
    }

    #[test]
    fn from_json__empty_input_is_default() {
        assert_eq!(AppConfig::default(), AppConfig::from_json(b"  \n").unwrap());
    }

    #[test]
    fn from_json__rejects_unknown_fields() {
        assert!(AppConfig::from_json(br#"{ "bonus": 1 }"#).is_err());
    }

    #[test]
    fn validate__rejects_zero_minimum_and_low_presets() {
        let config = AppConfig {
            min_amount: 0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());

        let config = AppConfig {
            deposit_presets: vec![50],
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate__accepts_any_number_of_presets() {
        let config = AppConfig {
            deposit_presets: (1..=12).map(|i| i * 1_000).collect(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load__reads_file_and_reports_bad_content() {
        let dir = std::env::temp_dir().join(format!("kerzh-demo-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let good = dir.join("good.json");
        let bad = dir.join("bad.json");
        fs::write(&good, br#"{ "min_amount": 250, "deposit_presets": [250, 500] }"#).unwrap();
        fs::write(&bad, br#"{ "min_amount": 0 }"#).unwrap();

        // when
        let loaded = AppConfig::load(&good).unwrap();
        let err = AppConfig::load(&bad).unwrap_err();
        let missing = AppConfig::load(dir.join("missing.json")).unwrap_err();

        // then
        assert_eq!(250, loaded.min_amount);
        assert_eq!(vec![250, 500], loaded.deposit_presets);
        assert!(format!("{err:?}").contains("min_amount must be at least 1"));
        assert!(missing.to_string().contains("Failed to read config file"));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn to_pretty_json__round_trips() {
        let config = AppConfig::default();
        let json = config.to_pretty_json().unwrap();
        assert_eq!(config, AppConfig::from_json(json.as_bytes()).unwrap());
    }

    #[test]
    fn expand_path__leaves_plain_paths_untouched() {
        assert_eq!(PathBuf::from("/var/log/kerzh"), expand_path("/var/log/kerzh"));
        assert_eq!(PathBuf::from("logs"), expand_path("logs"));
    }
}
