//! Lazy input resolution and the recursive synthesizer.
//!
//! [`InputResolver`] drives one desired state: every declared-but-unset
//! input is synthesized on demand, memoized into the state's own input map,
//! and guarded against re-entrant resolution by a stack of in-flight keys
//! (resolution is depth-first and sequential per state, so re-entering any
//! key on the stack is a cycle).
//!
//! Synthesis is pure with respect to the working state list: link-spawned
//! dependent states are reported back to the caller rather than pushed into
//! global state.

use std::sync::Arc;

use fabricate_resources::property::{PropertyDefinition, PropertyType};
use fabricate_resources::{
    DesiredState, Resource, ResolveError, ResourceLink, SiblingInputs, Value, ValueMap,
};

use crate::source::ValueSource;

/// Default exclusive upper bound on synthesized array length.
const DEFAULT_MAX_ITEMS: usize = 10;

/// Memoizing, cycle-checked input resolver for one desired state.
///
/// The state's own `inputs` map is the memo store, so caller-supplied
/// values are visible to sibling reads and are never overwritten.
pub struct InputResolver<'a> {
    resource: Arc<dyn Resource>,
    values: &'a mut ValueMap,
    source: &'a mut dyn ValueSource,
    in_flight: Vec<String>,
    spawned: Vec<DesiredState>,
}

impl<'a> InputResolver<'a> {
    /// Creates a resolver over a state's resource and input map.
    #[must_use]
    pub fn new(
        resource: Arc<dyn Resource>,
        values: &'a mut ValueMap,
        source: &'a mut dyn ValueSource,
    ) -> Self {
        Self {
            resource,
            values,
            source,
            in_flight: Vec::new(),
            spawned: Vec::new(),
        }
    }

    /// Resolves the input named `key`, synthesizing and memoizing it if
    /// unset.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Circular`] if `key` is already being
    /// resolved, directly or through a chain of sibling reads, or
    /// [`ResolveError::UnknownProperty`] if the resource does not declare
    /// it.
    pub fn resolve(&mut self, key: &str) -> Result<Value, ResolveError> {
        if self.in_flight.iter().any(|pending| pending == key) {
            return Err(ResolveError::Circular {
                resource: self.resource.name().to_string(),
                key: key.to_string(),
            });
        }

        let Some(definition) = self.resource.inputs().get(key).cloned() else {
            return Err(ResolveError::UnknownProperty {
                resource: self.resource.name().to_string(),
                key: key.to_string(),
            });
        };

        if let Some(existing) = self.values.get(key) {
            return Ok(existing.clone());
        }

        self.in_flight.push(key.to_string());
        let value = self.synthesize_definition(&definition)?;
        self.in_flight.pop();
        self.values.insert(key.to_string(), value.clone());
        Ok(value)
    }

    /// Consumes the resolver, returning the dependent states spawned by
    /// link synthesis.
    #[must_use]
    pub fn finish(self) -> Vec<DesiredState> {
        self.spawned
    }

    fn synthesize_definition(
        &mut self,
        definition: &PropertyDefinition,
    ) -> Result<Value, ResolveError> {
        // Constraint synthesis takes priority over everything, links
        // included.
        if let Some(constraint) = &definition.constraint {
            return constraint.generate_constrained_value(self);
        }
        self.synthesize_type(&definition.kind)
    }

    fn synthesize_type(&mut self, kind: &PropertyType) -> Result<Value, ResolveError> {
        match kind {
            PropertyType::Structured(fields) => {
                let mut map = ValueMap::with_capacity(fields.len());
                for (name, field_type) in fields {
                    map.insert(name.clone(), self.synthesize_type(field_type)?);
                }
                Ok(Value::Map(map))
            }
            PropertyType::Array { inner, constraint } => {
                let min = constraint.and_then(|c| c.min_items).unwrap_or(0);
                let max = constraint
                    .and_then(|c| c.max_items)
                    .unwrap_or(DEFAULT_MAX_ITEMS);
                // Half-open draw in [min, max): max itself is never produced.
                let count = if max > min {
                    min + (self.source.unit() * (max - min) as f64).floor() as usize
                } else {
                    min
                };
                let mut items = Vec::with_capacity(count);
                for _ in 0..count {
                    items.push(self.synthesize_type(inner)?);
                }
                Ok(Value::Array(items))
            }
            PropertyType::Link(link) => {
                let candidate = link.candidates[self.source.pick(link.candidates.len())].clone();
                let target = DesiredState::anonymous(candidate);
                let value = Value::Link(ResourceLink::new(target.id.clone(), &link.output_key));
                self.spawned.push(target);
                Ok(value)
            }
            PropertyType::Nullable(inner) => {
                let draw = self.source.unit();
                if let PropertyType::Undefinable(innermost) = inner.as_ref() {
                    if draw < 0.25 {
                        Ok(Value::Absent)
                    } else if draw < 0.5 {
                        Ok(Value::Null)
                    } else {
                        self.synthesize_type(innermost)
                    }
                } else if draw < 0.5 {
                    Ok(Value::Null)
                } else {
                    self.synthesize_type(inner)
                }
            }
            PropertyType::Undefinable(inner) => {
                if self.source.unit() < 0.5 {
                    Ok(Value::Absent)
                } else {
                    self.synthesize_type(inner)
                }
            }
            PropertyType::String => Ok(Value::String(self.source.words())),
            PropertyType::Number => Ok(Value::Number(self.source.number())),
            PropertyType::Boolean => Ok(Value::Bool(self.source.boolean())),
        }
    }
}

impl SiblingInputs for InputResolver<'_> {
    fn resolve(&mut self, key: &str) -> Result<Value, ResolveError> {
        InputResolver::resolve(self, key)
    }
}

/// Fills every declared-but-unset input of every state in the working list.
///
/// Link synthesis appends its spawned dependent states to the list, and the
/// walk continues over them (transitively), so on return every tracked
/// state has a complete input map.
///
/// # Errors
///
/// Structural resolution errors abort the whole pass immediately.
pub fn fill_state_tree(
    states: &mut Vec<DesiredState>,
    source: &mut dyn ValueSource,
) -> Result<(), ResolveError> {
    let mut index = 0;
    while index < states.len() {
        let resource = states[index].resource.clone();
        let mut spawned = {
            let state = &mut states[index];
            let mut resolver = InputResolver::new(resource.clone(), &mut state.inputs, source);
            for key in resource.inputs().keys() {
                resolver.resolve(key)?;
            }
            resolver.finish()
        };
        if !spawned.is_empty() {
            tracing::debug!(
                state = %states[index].name,
                spawned = spawned.len(),
                "link synthesis spawned dependent states"
            );
        }
        states.append(&mut spawned);
        index += 1;
    }
    Ok(())
}
