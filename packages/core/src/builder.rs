//! Document assembly.
//!
//! A build walks the entity graph once. Every primary entity is projected to a
//! resource object, given linkage for all of its associations, and then used as
//! the root of an include walk that side-loads related resources into a single
//! shared `included` collection.
//!
//! The include walk only follows associations whose dotted path is requested,
//! or is an ancestor of a requested path, so its depth is bounded by the
//! longest include path even when the entity graph has cycles.

use std::borrow::Cow;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::document::{
    Document, Identifier, Included, Linkage, PrimaryData, Relationship, ResourceObject,
};
use crate::error::Error;
use crate::fieldset::{Fieldset, FieldsOption};
use crate::include::{child_path, IncludePaths};
use crate::options::DocumentOptions;
use crate::resource::{render_id, Association, Resource};

/// The primary input of a build: one entity or an ordered collection.
#[derive(Debug, Clone)]
pub enum Primary<R> {
    Single(R),
    Collection(Vec<R>),
}

impl<R: Resource> Primary<R> {
    /// The type that a bare `fields` list applies to.
    fn primary_type(&self) -> Option<&str> {
        match self {
            Primary::Single(entity) => Some(entity.resource_type()),
            Primary::Collection(entities) => entities.first().map(Resource::resource_type),
        }
    }
}

#[derive(Debug, Clone)]
enum FieldsetSource {
    Resolved(Fieldset),
    /// A bare list of names; needs the primary type before it can be resolved.
    PrimaryList(FieldsOption),
}

/// Builds JSON:API documents with a fixed set of options.
///
/// The include option is parsed and the fieldset resolved once, in
/// [`DocumentBuilder::new`]. The builder holds no per-build state and can be
/// reused for any number of builds.
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    include: IncludePaths,
    fieldset: FieldsetSource,
}

impl DocumentBuilder {
    pub fn new(options: &DocumentOptions) -> Self {
        let fieldset = match (&options.fieldset, &options.fields) {
            (Some(prebuilt), _) => FieldsetSource::Resolved(prebuilt.clone()),
            (None, Some(list @ FieldsOption::Primary(_))) => {
                FieldsetSource::PrimaryList(list.clone())
            }
            (None, fields) => FieldsetSource::Resolved(Fieldset::resolve(fields.as_ref(), None)),
        };
        Self {
            include: IncludePaths::parse(options.include.as_ref()),
            fieldset,
        }
    }

    pub fn include_paths(&self) -> &IncludePaths {
        &self.include
    }

    /// Build the document for `primary`.
    ///
    /// Any error from a [`Resource`] aborts the build; no partial document is
    /// returned.
    pub fn build<R: Resource>(&self, primary: Primary<R>) -> Result<Document, Error> {
        let fieldset = self.fieldset_for(&primary);
        let mut walk = Walk {
            fieldset: &*fieldset,
            include: &self.include,
            included: Included::default(),
        };

        let data = match &primary {
            Primary::Single(entity) => PrimaryData::Single(walk.primary(entity)?),
            Primary::Collection(entities) => PrimaryData::Collection(
                entities
                    .iter()
                    .map(|entity| walk.primary(entity))
                    .collect::<Result<_, _>>()?,
            ),
        };

        let included = walk.included.into_vec();
        debug!(included = included.len(), "document built");
        Ok(Document { data, included })
    }

    fn fieldset_for<R: Resource>(&self, primary: &Primary<R>) -> Cow<'_, Fieldset> {
        match &self.fieldset {
            FieldsetSource::Resolved(fieldset) => Cow::Borrowed(fieldset),
            FieldsetSource::PrimaryList(list) => {
                Cow::Owned(Fieldset::resolve(Some(list), primary.primary_type()))
            }
        }
    }
}

/// Build a document in one call. Equivalent to
/// `DocumentBuilder::new(options).build(primary)`.
pub fn build_document<R: Resource>(
    primary: Primary<R>,
    options: &DocumentOptions,
) -> Result<Document, Error> {
    DocumentBuilder::new(options).build(primary)
}

// --- walk --------------------------------------------------------------------

/// Shared context of one build.
struct Walk<'b> {
    fieldset: &'b Fieldset,
    include: &'b IncludePaths,
    included: Included,
}

impl Walk<'_> {
    /// Project, link, and side-load one primary entity.
    fn primary<R: Resource>(&mut self, entity: &R) -> Result<ResourceObject, Error> {
        let associations = entity.associations();
        let mut resource = self.project(entity)?;
        attach_links(&mut resource, &associations)?;
        self.accumulate(associations, "")?;
        Ok(resource)
    }

    /// `type`, `id` and the visible attributes of `entity`; no links yet.
    fn project<R: Resource>(&self, entity: &R) -> Result<ResourceObject, Error> {
        let resource_type = entity.resource_type();
        let restriction = self.fieldset.fields_for(resource_type);
        let id = render_id(resource_type, entity.id()?)?;

        let mut attributes = entity.attributes(restriction)?;
        attributes.retain(|name, _| {
            name != "id" && name != "type" && restriction.map_or(true, |f| f.contains(name))
        });

        Ok(ResourceObject {
            resource_type: resource_type.to_string(),
            id,
            attributes,
            links: IndexMap::new(),
        })
    }

    /// Side-load the related resources reachable from `associations` at
    /// requested paths below `ancestor`.
    fn accumulate<R: Resource>(
        &mut self,
        associations: Vec<(&str, Association<R>)>,
        ancestor: &str,
    ) -> Result<(), Error> {
        for (name, association) in associations {
            let path = child_path(ancestor, name);
            let related = association.into_vec();

            if self.include.should_include(&path) {
                let before = self.included.len();
                for entity in &related {
                    let mut resource = self.project(entity)?;
                    attach_links(&mut resource, &entity.associations())?;
                    if !self.included.push_unique(resource) {
                        trace!(path = %path, "duplicate included resource skipped");
                    }
                }
                debug!(
                    path = %path,
                    added = self.included.len() - before,
                    "side-loaded related resources"
                );
            }

            if self.include.should_descend(&path) {
                for entity in &related {
                    self.accumulate(entity.associations(), &path)?;
                }
            }
        }
        Ok(())
    }
}

fn identify<R: Resource>(entity: &R) -> Result<Identifier, Error> {
    let resource_type = entity.resource_type();
    Ok(Identifier::new(
        resource_type,
        render_id(resource_type, entity.id()?)?,
    ))
}

/// Add linkage for every association to `resource.links`.
///
/// A repeated to-many name extends the existing linkage; anything else
/// replaces it.
fn attach_links<R: Resource>(
    resource: &mut ResourceObject,
    associations: &[(&str, Association<R>)],
) -> Result<(), Error> {
    for (name, association) in associations {
        let linkage = match association {
            Association::ToOne(None) => Linkage::Empty,
            Association::ToOne(Some(entity)) => Linkage::ToOne(identify(entity)?),
            Association::ToMany(entities) => {
                let identifiers = entities.iter().map(identify).collect::<Result<Vec<_>, _>>()?;
                if let Some(Relationship {
                    linkage: Linkage::ToMany(existing),
                }) = resource.links.get_mut(*name)
                {
                    existing.extend(identifiers);
                    continue;
                }
                Linkage::ToMany(identifiers)
            }
        };
        resource
            .links
            .insert(name.to_string(), Relationship { linkage });
    }
    Ok(())
}

// --- tests -------------------------------------------------------------------
