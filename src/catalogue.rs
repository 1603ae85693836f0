//! Service packages that can be visualized.

use serde::Deserialize;

use crate::error::GatewayError;
use crate::gateway::VisualRequest;

/// A service package and the prompt material used to preview it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServicePackage {
    /// Stable entity id (e.g., `"tequila-tour"`).
    pub id: String,
    /// Display title.
    pub title: String,
    /// Subject prompt for the preview image.
    pub ai_prompt: String,
    /// Extra negative constraints specific to this package.
    #[serde(default)]
    pub negative_prompt_addon: Option<String>,
    /// Static image shown until a preview is generated.
    #[serde(default)]
    pub image: String,
}

impl ServicePackage {
    /// Build the visual request for this package.
    ///
    /// # Errors
    ///
    /// Returns an error if the package has an empty prompt.
    pub fn visual_request(&self) -> Result<VisualRequest, GatewayError> {
        VisualRequest::new(&self.ai_prompt, self.negative_prompt_addon.as_deref())
    }
}

/// Lookup table of service packages.
#[derive(Debug, Clone)]
pub struct Catalogue {
    services: Vec<ServicePackage>,
}

impl Default for Catalogue {
    fn default() -> Self {
        Self { services: builtin() }
    }
}

impl Catalogue {
    /// Built-in packages, with `extra` entries added or replacing built-ins by id.
    #[must_use]
    pub fn with_overrides(extra: &[ServicePackage]) -> Self {
        let mut catalogue = Self::default();
        for service in extra {
            match catalogue.services.iter_mut().find(|s| s.id == service.id) {
                Some(existing) => *existing = service.clone(),
                None => catalogue.services.push(service.clone()),
            }
        }
        catalogue
    }

    /// Find a package by id.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UnknownService`] if no package has that id.
    pub fn get(&self, id: &str) -> Result<&ServicePackage, GatewayError> {
        self.services
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| GatewayError::UnknownService { id: id.to_string() })
    }

    /// All packages in display order.
    pub fn iter(&self) -> impl Iterator<Item = &ServicePackage> {
        self.services.iter()
    }
}

fn package(id: &str, title: &str, ai_prompt: &str, addon: Option<&str>, image: &str) -> ServicePackage {
    ServicePackage {
        id: id.to_string(),
        title: title.to_string(),
        ai_prompt: ai_prompt.to_string(),
        negative_prompt_addon: addon.map(str::to_string),
        image: image.to_string(),
    }
}

fn builtin() -> Vec<ServicePackage> {
    vec![
        package(
            "renta-hora",
            "Renta por Hora (Zapopan & GDL)",
            "Ultra realistic night photograph of a modern party bus driving through Guadalajara \
             and Zapopan city streets, interior LEDs glowing purple and pink through the windows, \
             group of friends laughing and holding drinks inside, reflections of city lights on \
             the bus, safe and private transportation feeling, cinematic night lighting, wide \
             angle exterior view, horizontal composition, 16:9 aspect ratio.",
            None,
            "https://images.unsplash.com/photo-1541339905195-062d55707a0a?auto=format&fit=crop&q=80&w=800",
        ),
        package(
            "xv-anos",
            "Limo PartyBus / XV Años",
            "Ultra realistic photograph of a quinceañera in a modern pastel dress stepping into a \
             luxury party bus in Guadalajara at sunset, friends and family smiling around her, \
             bus door open with neon purple and pink lights, elegant yet fun atmosphere, \
             horizontal wide shot, 16:9 aspect ratio.",
            Some(
                "no iglesia específica reconocible, no marcas visibles en vestidos o trajes, no \
                 símbolos religiosos muy explícitos",
            ),
            "https://images.unsplash.com/photo-1517457373958-b7bdd4587205?auto=format&fit=crop&q=80&w=800",
        ),
        package(
            "tequila-tour",
            "Tour a Tequila Experience",
            "Ultra realistic photograph of a luxury party bus parked next to blue agave fields in \
             Tequila, Jalisco, group of friends stepping out of the bus with drinks and hats, \
             traditional tequila town and distillery buildings in the background, bright blue \
             sky, horizontal wide landscape shot, 16:9 aspect ratio.",
            Some("no etiquetas de marcas de tequila, cerveza o refresco"),
            "https://images.unsplash.com/photo-1516997121675-4c2d1684aa3e?auto=format&fit=crop&q=80&w=800",
        ),
        package(
            "bachelorette",
            "Despedida de Soltera VIP",
            "Ultra realistic interior photograph of a bachelorette party inside a luxury party bus \
             in Guadalajara, group of young women in stylish night-out dresses, bride wearing a \
             white veil or sash, all holding drinks and laughing, neon pink and purple lighting, \
             horizontal medium wide shot, 16:9 aspect ratio.",
            None,
            "https://images.unsplash.com/photo-1533174072545-7a4b6ad7a6c3?auto=format&fit=crop&q=80&w=800",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_ids() {
        let ids: Vec<_> = Catalogue::default().iter().map(|s| s.id.clone()).collect();
        assert_eq!(ids, ["renta-hora", "xv-anos", "tequila-tour", "bachelorette"]);
    }

    #[test]
    fn unknown_service_errors() {
        let err = Catalogue::default().get("yate").unwrap_err();
        assert!(matches!(err, GatewayError::UnknownService { ref id } if id == "yate"));
    }

    #[test]
    fn tequila_tour_carries_addon() {
        let catalogue = Catalogue::default();
        let request = catalogue.get("tequila-tour").unwrap().visual_request().unwrap();
        assert_eq!(
            request.negative_fragment.as_deref(),
            Some("no etiquetas de marcas de tequila, cerveza o refresco")
        );
    }

    #[test]
    fn overrides_replace_and_append() {
        let extra = vec![
            package("tequila-tour", "Tequila", "agave fields at dawn", None, ""),
            package("boda", "Bodas", "wedding guests boarding a bus", Some("no novias reales"), ""),
        ];
        let catalogue = Catalogue::with_overrides(&extra);
        assert_eq!(catalogue.iter().count(), 5);
        assert_eq!(catalogue.get("tequila-tour").unwrap().ai_prompt, "agave fields at dawn");
        assert_eq!(catalogue.get("boda").unwrap().title, "Bodas");
    }
}
