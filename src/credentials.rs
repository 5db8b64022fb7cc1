use dialoguer::{Input, Password};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::CredentialsConfig;
use crate::error::{ChoresError, Result};

/// Connection details for the tracker. Loaded once, then only read.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub base_uri: String,
    pub project: String,
    pub display_name: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .field("base_uri", &self.base_uri)
            .field("project", &self.project)
            .field("display_name", &self.display_name)
            .finish()
    }
}

impl Credentials {
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("username", &self.username),
            ("password", &self.password),
            ("base uri", &self.base_uri),
            ("project", &self.project),
            ("display name", &self.display_name),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(ChoresError::Credentials(format!("{name} is empty")));
            }
        }
        Ok(())
    }

    fn to_lines(&self) -> String {
        format!(
            "{}\n{}\n{}\n{}\n{}\n",
            self.username, self.password, self.base_uri, self.project, self.display_name
        )
    }
}

pub trait CredentialProvider {
    fn credentials(&self) -> Result<Credentials>;
}

/// Stores credentials as five plaintext lines and asks for them on first run.
pub struct FileCredentialProvider {
    path: PathBuf,
    defaults: CredentialsConfig,
}

impl FileCredentialProvider {
    pub fn new(path: PathBuf, defaults: CredentialsConfig) -> Self {
        Self { path, defaults }
    }
}

impl CredentialProvider for FileCredentialProvider {
    fn credentials(&self) -> Result<Credentials> {
        if let Some(creds) = read_credentials(&self.path)? {
            return Ok(creds);
        }
        println!("It looks like this is your first time...");
        let creds = prompt_credentials(&self.defaults)?;
        write_credentials(&self.path, &creds)?;
        Ok(creds)
    }
}

/// Reads the credential file. `Ok(None)` when it does not exist yet.
///
/// A file with fewer than five lines, or with a blank field, is deleted so the
/// next run starts over.
pub fn read_credentials(path: &Path) -> Result<Option<Credentials>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path)?;
    let lines: Vec<&str> = contents.lines().map(str::trim_end).collect();
    if lines.len() < 5 {
        warn!("Credential file {} is incomplete, removing it", path.display());
        std::fs::remove_file(path)?;
        return Err(ChoresError::Credentials(
            "There was a problem reading your credentials. Please try again".into(),
        ));
    }

    let creds = Credentials {
        username: lines[0].to_string(),
        password: lines[1].to_string(),
        base_uri: lines[2].to_string(),
        project: lines[3].to_string(),
        display_name: clean_display_name(lines[4]),
    };
    if let Err(e) = creds.validate() {
        warn!("Credential file {} is invalid ({e}), removing it", path.display());
        std::fs::remove_file(path)?;
        return Err(e);
    }
    debug!("Loaded credentials for {}", creds.username);
    Ok(Some(creds))
}

pub fn write_credentials(path: &Path, creds: &Credentials) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, creds.to_lines())?;
    Ok(())
}

fn clean_display_name(raw: &str) -> String {
    raw.replace("\\\\", "\\").replace('\'', "")
}

/// `First Last<DOMAIN\FirstL>`, the identity format the tracker expects for assignees.
pub fn build_display_name(first: &str, last: &str, domain: &str) -> String {
    let initial: String = last.chars().take(1).collect();
    format!("{first} {last}<{domain}\\{first}{initial}>")
}

fn prompt_credentials(defaults: &CredentialsConfig) -> Result<Credentials> {
    let prompt_err = |e: dialoguer::Error| ChoresError::Credentials(e.to_string());

    let username: String = Input::new()
        .with_prompt("What is your TFS username?")
        .interact_text()
        .map_err(prompt_err)?;
    let password = Password::new()
        .with_prompt("What is your TFS password?")
        .interact()
        .map_err(prompt_err)?;
    let first: String = Input::new()
        .with_prompt("What is your first name?")
        .interact_text()
        .map_err(prompt_err)?;
    let last: String = Input::new()
        .with_prompt("What is your last name?")
        .interact_text()
        .map_err(prompt_err)?;

    let creds = Credentials {
        username,
        password,
        base_uri: defaults.default_uri.clone(),
        project: defaults.default_project.clone(),
        display_name: build_display_name(first.trim(), last.trim(), &defaults.domain),
    };
    creds.validate()?;
    Ok(creds)
}

#[cfg(test)]
pub fn test_credentials() -> Credentials {
    Credentials {
        username: "dana".into(),
        password: "hunter2".into(),
        base_uri: "https://tfs.example/DefaultCollection/".into(),
        project: "theLotter".into(),
        display_name: "Dana Levi<NET-BET\\DanaL>".into(),
    }
}
