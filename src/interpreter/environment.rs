use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

use super::value::{read_slot, Slot, Value};

pub type Env<'p> = Rc<RefCell<Environment<'p>>>;

/// Runtime counterpart of a scope: a name to slot table with a parent link.
///
/// References are two names sharing one slot.
pub struct Environment<'p> {
    parent: Option<Env<'p>>,
    values: HashMap<String, Slot<'p>>,
}

impl<'p> Environment<'p> {
    pub fn new(parent: Option<Env<'p>>) -> Env<'p> {
        Rc::new(RefCell::new(Environment {
            parent,
            values: HashMap::new(),
        }))
    }

    pub fn child(parent: &Env<'p>) -> Env<'p> {
        Environment::new(Some(parent.clone()))
    }

    /// Binds `name` to a fresh slot holding `value`.
    pub fn define(&mut self, name: impl Into<String>, value: Value<'p>) -> Slot<'p> {
        let slot = Rc::new(RefCell::new(value));
        self.values.insert(name.into(), slot.clone());
        slot
    }

    /// Binds `name` to an existing slot.
    pub fn alias(&mut self, name: impl Into<String>, slot: Slot<'p>) {
        self.values.insert(name.into(), slot);
    }

    pub fn get_local(&self, name: &str) -> Option<Slot<'p>> {
        self.values.get(name).cloned()
    }

    pub fn has_local(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Moves every binding out, leaving the environment empty.
    pub fn take_values(&mut self) -> HashMap<String, Slot<'p>> {
        std::mem::take(&mut self.values)
    }
}

/// Finds the nearest slot bound to `name`, walking outward.
pub fn lookup<'p>(env: &Env<'p>, name: &str) -> Option<Slot<'p>> {
    let mut current = env.clone();

    loop {
        if let Some(slot) = current.borrow().get_local(name) {
            return Some(slot);
        }

        let parent = current.borrow().parent.clone()?;
        current = parent;
    }
}

/// Value bound to `name`; unresolved names read as null.
pub fn get<'p>(env: &Env<'p>, name: &str) -> Value<'p> {
    lookup(env, name)
        .as_ref()
        .map(read_slot)
        .unwrap_or(Value::Null)
}

impl fmt::Debug for Environment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = self.values.keys().collect::<Vec<_>>();
        names.sort_unstable();

        f.debug_struct("Environment")
            .field("names", &names)
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}
