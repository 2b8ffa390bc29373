mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Chat, Config, LlmProviderConfig, Postgres, Providers, Security, Service, Storage};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}

	for (label, provider) in
		[("intent", &cfg.providers.intent), ("reply", &cfg.providers.reply)]
	{
		if provider.api_base.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("providers.{label}.api_base must be non-empty."),
			});
		}
		if provider.api_key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("providers.{label}.api_key must be non-empty."),
			});
		}
		if provider.model.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("providers.{label}.model must be non-empty."),
			});
		}
		if provider.timeout_ms == 0 {
			return Err(Error::Validation {
				message: format!("providers.{label}.timeout_ms must be greater than zero."),
			});
		}
		if provider.max_tokens == 0 {
			return Err(Error::Validation {
				message: format!("providers.{label}.max_tokens must be greater than zero."),
			});
		}
		if !provider.temperature.is_finite() {
			return Err(Error::Validation {
				message: format!("providers.{label}.temperature must be a finite number."),
			});
		}
		if !(0.0..=2.0).contains(&provider.temperature) {
			return Err(Error::Validation {
				message: format!("providers.{label}.temperature must be in the range 0.0-2.0."),
			});
		}
	}

	if cfg.chat.history_limit == 0 {
		return Err(Error::Validation {
			message: "chat.history_limit must be greater than zero.".to_string(),
		});
	}
	if cfg.chat.intent_context_turns == 0 {
		return Err(Error::Validation {
			message: "chat.intent_context_turns must be greater than zero.".to_string(),
		});
	}
	if cfg.chat.reply_context_turns == 0 {
		return Err(Error::Validation {
			message: "chat.reply_context_turns must be greater than zero.".to_string(),
		});
	}
	if cfg.chat.result_limit == 0 {
		return Err(Error::Validation {
			message: "chat.result_limit must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	for provider in [&mut cfg.providers.intent, &mut cfg.providers.reply] {
		while provider.api_base.ends_with('/') {
			provider.api_base.pop();
		}
	}
}
