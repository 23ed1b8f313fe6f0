//! The scope tree.
//!
//! Scopes form a tree, but each scope's link to its parent is a plain arena index, not an owned
//! reference — the tree's only owner is the `SymbolTable` that holds the arena. This avoids the
//! ownership cycle a naive "child owns nothing, parent owns children, child also points back to
//! parent" design runs into in a language without a tracing GC.

use crate::symbol::{DataType, Symbol, SymbolKind};
use fax_util::index_vec::IndexVec;
use fax_util::new_index_type;
use indexmap::IndexMap;

new_index_type!(ScopeId);

/// One lexical scope: a name, a level, an arena index to its parent (`None` for the root), its
/// children's arena indices, and the symbols declared directly in it.
#[derive(Debug, Clone)]
pub struct Scope {
    pub name: String,
    pub level: usize,
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
    pub symbols: IndexMap<String, Symbol>,
}

/// Error returned when a declaration would shadow an existing name in the same scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedeclarationError {
    pub name: String,
    pub scope_name: String,
}

/// Owns the entire scope tree as a flat arena, plus the monotonically increasing memory-address
/// counter used to assign each declared symbol a stable address. The counter lives here —
/// component-owned, not a global — because a `SymbolTable` is constructed fresh per compilation.
#[derive(Debug)]
pub struct SymbolTable {
    scopes: IndexVec<ScopeId, Scope>,
    root: ScopeId,
    current: ScopeId,
    next_address: usize,
}

impl SymbolTable {
    /// Creates a table with a single root scope named `"global"` at level 0.
    pub fn new() -> Self {
        let mut scopes = IndexVec::new();
        let root = scopes.push(Scope {
            name: "global".to_string(),
            level: 0,
            parent: None,
            children: Vec::new(),
            symbols: IndexMap::new(),
        });
        SymbolTable {
            scopes,
            root,
            current: root,
            next_address: 0,
        }
    }

    pub fn root(&self) -> &Scope {
        &self.scopes[self.root]
    }

    pub fn scopes(&self) -> &[Scope] {
        self.scopes.as_slice()
    }

    pub fn current_scope_name(&self) -> &str {
        &self.scopes[self.current].name
    }

    /// Pushes a new child scope under the current scope and makes it current.
    pub fn push_scope(&mut self, name: impl Into<String>) {
        let level = self.scopes[self.current].level + 1;
        let parent = self.current;
        let index = self.scopes.push(Scope {
            name: name.into(),
            level,
            parent: Some(parent),
            children: Vec::new(),
            symbols: IndexMap::new(),
        });
        self.scopes[parent].children.push(index);
        self.current = index;
    }

    /// Returns to the parent of the current scope. No-op at the root.
    pub fn pop_scope(&mut self) {
        if let Some(parent) = self.scopes[self.current].parent {
            self.current = parent;
        }
    }

    /// Declares `name` in the current scope, assigning it the next memory address.
    ///
    /// Fails with [`RedeclarationError`] if `name` is already declared in this exact scope
    /// (shadowing an outer scope's declaration is allowed; redeclaring within the same scope is
    /// not).
    pub fn declare(
        &mut self,
        name: &str,
        symbol_kind: SymbolKind,
        data_type: DataType,
        line: u32,
        initialized: bool,
    ) -> Result<(), RedeclarationError> {
        let scope_name = self.scopes[self.current].name.clone();
        if self.scopes[self.current].symbols.contains_key(name) {
            return Err(RedeclarationError {
                name: name.to_string(),
                scope_name,
            });
        }
        let address = self.next_address;
        self.next_address += 1;
        let symbol = Symbol {
            name: name.to_string(),
            symbol_kind,
            data_type,
            scope_name,
            declaration_line: line,
            initialized,
            used: false,
            memory_address: address,
        };
        self.scopes[self.current].symbols.insert(name.to_string(), symbol);
        Ok(())
    }

    /// Resolves `name` by walking from the current scope outward to the root. Returns the arena
    /// index of the owning scope and a shared reference to the symbol, if found.
    pub fn resolve(&self, name: &str) -> Option<(ScopeId, &Symbol)> {
        let mut scope_index = Some(self.current);
        while let Some(idx) = scope_index {
            if let Some(symbol) = self.scopes[idx].symbols.get(name) {
                return Some((idx, symbol));
            }
            scope_index = self.scopes[idx].parent;
        }
        None
    }

    /// Same lookup as [`resolve`](Self::resolve) but returns a mutable reference so the analyzer
    /// can flip `used`/`initialized` on the resolved symbol.
    pub fn resolve_mut(&mut self, name: &str) -> Option<&mut Symbol> {
        let mut scope_index = Some(self.current);
        while let Some(idx) = scope_index {
            if self.scopes[idx].symbols.contains_key(name) {
                return self.scopes[idx].symbols.get_mut(name);
            }
            scope_index = self.scopes[idx].parent;
        }
        None
    }

    /// Declares a function in the root scope regardless of the current scope (function
    /// declarations are always global in this language).
    pub fn declare_function(&mut self, name: &str, line: u32) -> Result<(), RedeclarationError> {
        let root = self.root;
        if self.scopes[root].symbols.contains_key(name) {
            return Err(RedeclarationError {
                name: name.to_string(),
                scope_name: self.scopes[root].name.clone(),
            });
        }
        let address = self.next_address;
        self.next_address += 1;
        self.scopes[root].symbols.insert(
            name.to_string(),
            Symbol {
                name: name.to_string(),
                symbol_kind: SymbolKind::Function,
                data_type: DataType::Void,
                scope_name: self.scopes[root].name.clone(),
                declaration_line: line,
                initialized: true,
                used: false,
                memory_address: address,
            },
        );
        Ok(())
    }

    /// Total number of declared symbols across every scope — the `symbols_count` metric.
    pub fn symbol_count(&self) -> usize {
        self.scopes.iter().map(|s| s.symbols.len()).sum()
    }

    /// Visits every symbol in the tree, depth-first, yielding `(scope, symbol)` pairs. Used for
    /// the terminal unused/uninitialized pass.
    pub fn walk_symbols(&self) -> impl Iterator<Item = (&Scope, &Symbol)> {
        self.scopes
            .iter()
            .flat_map(|scope| scope.symbols.values().map(move |sym| (scope, sym)))
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        SymbolTable::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_table_has_a_global_root_scope() {
        let table = SymbolTable::new();
        assert_eq!(table.root().name, "global");
        assert_eq!(table.root().level, 0);
        assert!(table.root().parent.is_none());
    }

    #[test]
    fn declaring_twice_in_the_same_scope_fails() {
        let mut table = SymbolTable::new();
        table
            .declare("x", SymbolKind::Variable, DataType::Int, 1, true)
            .unwrap();
        let err = table
            .declare("x", SymbolKind::Variable, DataType::Int, 2, true)
            .unwrap_err();
        assert_eq!(err.name, "x");
        assert_eq!(err.scope_name, "global");
    }

    #[test]
    fn child_scope_can_shadow_without_conflict() {
        let mut table = SymbolTable::new();
        table
            .declare("x", SymbolKind::Variable, DataType::Int, 1, true)
            .unwrap();
        table.push_scope("inner");
        assert!(table
            .declare("x", SymbolKind::Variable, DataType::Int, 2, true)
            .is_ok());
    }

    #[test]
    fn resolve_walks_outward_through_parents() {
        let mut table = SymbolTable::new();
        table
            .declare("x", SymbolKind::Variable, DataType::Int, 1, true)
            .unwrap();
        table.push_scope("inner");
        let (_, sym) = table.resolve("x").unwrap();
        assert_eq!(sym.name, "x");
    }

    #[test]
    fn pop_scope_returns_to_parent() {
        let mut table = SymbolTable::new();
        table.push_scope("inner");
        table.pop_scope();
        assert_eq!(table.current_scope_name(), "global");
    }

    #[test]
    fn memory_addresses_are_unique_and_sequential() {
        let mut table = SymbolTable::new();
        table
            .declare("a", SymbolKind::Variable, DataType::Int, 1, true)
            .unwrap();
        table
            .declare("b", SymbolKind::Variable, DataType::Int, 2, true)
            .unwrap();
        let (_, a) = table.resolve("a").unwrap();
        assert_eq!(a.memory_address, 0);
        let (_, b) = table.resolve("b").unwrap();
        assert_eq!(b.memory_address, 1);
    }
}
