//! Netrc-backed storage for Earthdata login credentials
use anyhow::{anyhow, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Holds login credentials keyed by remote host.
pub trait CredentialStore {
    fn register(&mut self, host: &str, login: &str, password: &str) -> Result<()>;
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Machine {
    pub host: String,
    pub login: String,
    pub password: String,
}

/// A netrc file. Registrations are upserts keyed by host and are written
/// back to disk immediately.
#[derive(Debug)]
pub struct Netrc {
    path: PathBuf,
    machines: Vec<Machine>,
}

impl Netrc {
    /// Load a netrc file. A missing file is an empty store.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Ok(Self {
                path,
                machines: vec![],
            });
        }
        let content = fs::read_to_string(&path)?;
        let machines = parse(&content)?;
        Ok(Self { path, machines })
    }

    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(anyhow!("Unable to locate home directory"))?;
        Ok(home.join(".netrc"))
    }

    pub fn machine(&self, host: &str) -> Option<&Machine> {
        self.machines.iter().find(|m| m.host == host)
    }

    fn save(&self) -> Result<()> {
        let mut content = String::new();
        for machine in &self.machines {
            content.push_str(&format!(
                "machine {} login {} password {}\n",
                machine.host, machine.login, machine.password
            ));
        }
        fs::write(&self.path, content)?;

        // Credentials file must not be group/world readable
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }
}

impl CredentialStore for Netrc {
    fn register(&mut self, host: &str, login: &str, password: &str) -> Result<()> {
        let entry = Machine {
            host: host.to_string(),
            login: login.to_string(),
            password: password.to_string(),
        };
        match self.machines.iter_mut().find(|m| m.host == host) {
            Some(existing) => *existing = entry,
            None => self.machines.push(entry),
        }
        self.save()
    }
}

fn parse(content: &str) -> Result<Vec<Machine>> {
    let tokens: Vec<&str> = content.split_whitespace().collect();
    let mut machines: Vec<Machine> = vec![];

    let mut i = 0;
    while i < tokens.len() {
        match tokens[i] {
            "machine" => {
                let host = *tokens
                    .get(i + 1)
                    .ok_or(anyhow!("Unexpected end of netrc after 'machine'"))?;
                machines.push(Machine {
                    host: host.to_string(),
                    login: String::new(),
                    password: String::new(),
                });
                i += 2;
            }
            "login" | "password" => {
                let key = tokens[i];
                let value = *tokens
                    .get(i + 1)
                    .ok_or(anyhow!("Unexpected end of netrc after '{}'", key))?;
                let current = machines
                    .last_mut()
                    .ok_or(anyhow!("netrc token '{}' before any machine entry", key))?;
                if key == "login" {
                    current.login = value.to_string();
                } else {
                    current.password = value.to_string();
                }
                i += 2;
            }
            _ => i += 1,
        }
    }
    Ok(machines)
}
