use crate::core::config::data::Config;

impl Config {
    pub fn print_all(&self) {
        println!("Current configuration:");
        match self.default_zone {
            Some(zone) => println!("  default-zone: {zone}"),
            None => println!("  default-zone: (unset, using {})", self.effective_zone()),
        }
        match &self.model {
            Some(model) => println!("  model: {model}"),
            None => println!("  model: (unset, using {})", self.effective_model()),
        }
        match &self.base_url {
            Some(url) => println!("  base-url: {url}"),
            None => println!("  base-url: (unset, using {})", self.effective_base_url()),
        }
    }
}
