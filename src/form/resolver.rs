use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::domain::{FieldDescriptor, FieldKind, FormDescriptor, WidgetOptions};

use super::error::ResolveError;
use super::field::components::{
    ChoiceComponent, FileUploadComponent, MapPositionComponent, MultiLanguageComponent,
    NumberComponent, TextComponent, ToggleComponent,
};
use super::field::{ComponentPalette, FieldComponent};

type KindFactory =
    Arc<dyn Fn(FieldKind, &Arc<ComponentPalette>) -> Box<dyn FieldComponent> + Send + Sync>;
type CustomFactory =
    Arc<dyn Fn(&FieldDescriptor, &Value) -> Box<dyn FieldComponent> + Send + Sync>;

/// Lookup from field kind to widget factory.
///
/// Resolution happens once when a form is built; a descriptor that cannot
/// be bound is reported there instead of rendering nothing.
#[derive(Clone)]
pub struct WidgetResolver {
    palette: Arc<ComponentPalette>,
    kinds: HashMap<FieldKind, KindFactory>,
    custom: HashMap<String, CustomFactory>,
}

impl std::fmt::Debug for WidgetResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut custom: Vec<_> = self.custom.keys().collect();
        custom.sort();
        f.debug_struct("WidgetResolver")
            .field("kinds", &self.kinds.len())
            .field("custom", &custom)
            .finish()
    }
}

impl Default for WidgetResolver {
    fn default() -> Self {
        Self::new(Arc::new(ComponentPalette::default()))
    }
}

impl WidgetResolver {
    pub fn new(palette: Arc<ComponentPalette>) -> Self {
        let mut resolver = Self {
            palette,
            kinds: HashMap::new(),
            custom: HashMap::new(),
        };
        for kind in [
            FieldKind::Text,
            FieldKind::Email,
            FieldKind::Password,
            FieldKind::Phone,
            FieldKind::RichText,
            FieldKind::Color,
            FieldKind::Date,
        ] {
            resolver.register(kind, |kind, _| Box::new(TextComponent::new(kind)));
        }
        resolver.register(FieldKind::Number, |_, palette| {
            Box::new(NumberComponent::new(Arc::clone(palette)))
        });
        for kind in [FieldKind::Checkbox, FieldKind::Switch] {
            resolver.register(kind, |kind, palette| {
                Box::new(ToggleComponent::new(kind, Arc::clone(palette)))
            });
        }
        for kind in [FieldKind::Select, FieldKind::Radio] {
            resolver.register(kind, |_, palette| {
                Box::new(ChoiceComponent::new(Arc::clone(palette)))
            });
        }
        resolver.register(FieldKind::FileUpload, |_, _| Box::new(FileUploadComponent::new()));
        resolver.register(FieldKind::MapPosition, |_, _| {
            Box::new(MapPositionComponent::new())
        });
        resolver
    }

    pub fn palette(&self) -> &Arc<ComponentPalette> {
        &self.palette
    }

    /// Replace the factory used for a built-in kind.
    pub fn register<F>(&mut self, kind: FieldKind, factory: F) -> &mut Self
    where
        F: Fn(FieldKind, &Arc<ComponentPalette>) -> Box<dyn FieldComponent> + Send + Sync + 'static,
    {
        self.kinds.insert(kind, Arc::new(factory));
        self
    }

    /// Register a widget for `custom` descriptors whose options name `widget`.
    pub fn register_custom<F>(&mut self, widget: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&FieldDescriptor, &Value) -> Box<dyn FieldComponent> + Send + Sync + 'static,
    {
        self.custom.insert(widget.into(), Arc::new(factory));
        self
    }

    pub fn resolve(&self, descriptor: &FieldDescriptor) -> Result<Box<dyn FieldComponent>, ResolveError> {
        match (descriptor.kind, &descriptor.widget_options) {
            (FieldKind::Custom, WidgetOptions::Custom { widget, config }) => self
                .custom
                .get(widget)
                .map(|factory| factory(descriptor, config))
                .ok_or_else(|| ResolveError::UnknownCustomWidget {
                    field: descriptor.name.clone(),
                    widget: widget.clone(),
                }),
            (FieldKind::Custom, _) => Err(ResolveError::UnknownCustomWidget {
                field: descriptor.name.clone(),
                widget: String::new(),
            }),
            (FieldKind::MultiLanguage, WidgetOptions::MultiLanguage { sub_kind, .. }) => {
                let inner = self.resolve_kind(descriptor, *sub_kind)?;
                Ok(Box::new(MultiLanguageComponent::new(inner)))
            }
            (kind, _) => self.resolve_kind(descriptor, kind),
        }
    }

    /// Resolve every descriptor of a form, failing on the first one that cannot be bound.
    pub fn resolve_all(
        &self,
        form: &FormDescriptor,
    ) -> Result<IndexMap<String, Box<dyn FieldComponent>>, ResolveError> {
        form.fields
            .iter()
            .map(|field| Ok((field.name.clone(), self.resolve(field)?)))
            .collect()
    }

    fn resolve_kind(
        &self,
        descriptor: &FieldDescriptor,
        kind: FieldKind,
    ) -> Result<Box<dyn FieldComponent>, ResolveError> {
        self.kinds
            .get(&kind)
            .map(|factory| factory(kind, &self.palette))
            .ok_or_else(|| ResolveError::UnsupportedKind {
                field: descriptor.name.clone(),
                kind,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::field::{BoundField, ComponentKind};
    use serde_json::json;

    #[derive(Debug, Clone)]
    struct Stars(u64);

    impl FieldComponent for Stars {
        fn kind(&self) -> ComponentKind {
            ComponentKind::Custom
        }

        fn display(&self, field: &BoundField<'_>) -> String {
            let count = field.value.as_u64().unwrap_or(0).min(self.0);
            "*".repeat(count as usize)
        }
    }

    fn custom(widget: &str) -> FieldDescriptor {
        FieldDescriptor::new(FieldKind::Custom, "rating").with_options(WidgetOptions::Custom {
            widget: widget.into(),
            config: json!({ "max": 5 }),
        })
    }

    #[test]
    fn every_builtin_kind_resolves() {
        let resolver = WidgetResolver::default();
        for kind in [
            FieldKind::Text,
            FieldKind::Email,
            FieldKind::Number,
            FieldKind::Password,
            FieldKind::Checkbox,
            FieldKind::Switch,
            FieldKind::Select,
            FieldKind::Radio,
            FieldKind::Date,
            FieldKind::Phone,
            FieldKind::RichText,
            FieldKind::FileUpload,
            FieldKind::MapPosition,
            FieldKind::Color,
        ] {
            assert!(resolver.resolve(&FieldDescriptor::new(kind, "f")).is_ok(), "{kind}");
        }
    }

    #[test]
    fn unknown_custom_widget_fails_fast() {
        let resolver = WidgetResolver::default();
        assert_eq!(
            resolver.resolve(&custom("stars")).unwrap_err(),
            ResolveError::UnknownCustomWidget {
                field: "rating".into(),
                widget: "stars".into(),
            }
        );
    }

    #[test]
    fn registered_custom_widget_receives_config() {
        let mut resolver = WidgetResolver::default();
        resolver.register_custom("stars", |_, config| {
            Box::new(Stars(config["max"].as_u64().unwrap_or(3)))
        });
        let descriptor = custom("stars");
        let component = resolver.resolve(&descriptor).unwrap();
        let value = json!(9);
        assert_eq!(component.display(&BoundField::new(&descriptor, &value)), "*****");
    }

    #[test]
    fn multi_language_wraps_sub_kind() {
        let descriptor = FieldDescriptor::new(FieldKind::MultiLanguage, "title").with_options(
            WidgetOptions::MultiLanguage {
                locales: vec!["en".into(), "ar".into()],
                sub_kind: FieldKind::RichText,
                auto_translate: false,
            },
        );
        let component = WidgetResolver::default().resolve(&descriptor).unwrap();
        assert_eq!(component.kind(), ComponentKind::MultiLanguage);
        assert!(component.is_empty(&json!("<p><br></p>")));
    }
}
