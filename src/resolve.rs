//! Substitution resolution
//!
//! Runs once per parse, after the tree is complete. Every `${path}` is looked
//! up against the document root and its placeholder is pointed at a fully
//! resolved, shared copy of the target. Lookups may pass through other
//! substitutions; a path that (directly or indirectly) needs itself is a
//! cycle and fails instead of recursing forever. Chains of substitutions are
//! bounded by the same nesting limit the parser uses.

use crate::error::ResolveError;
use crate::value::{ConfigRoot, HoconElement, HoconObject, HoconSubstitution, HoconValue};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// Resolves every substitution of `root` in place
///
/// `max_depth` bounds how many substitutions may be followed to reach a
/// value, see [`ParserConfig::max_depth`](crate::ParserConfig).
pub fn resolve_substitutions(root: &mut ConfigRoot, max_depth: usize) -> Result<(), ResolveError> {
    if root.substitutions.is_empty() && !contains_substitution(&root.value) {
        return Ok(());
    }
    debug!(
        count = root.substitutions.len(),
        max_depth = max_depth,
        "resolving substitutions"
    );

    let memo = {
        let mut resolver = Resolver::new(&root.value, max_depth);
        for substitution in &root.substitutions {
            resolver.resolve(&substitution.path)?;
        }
        let mut remaining = Vec::new();
        collect_paths(&root.value, &mut remaining);
        for path in remaining {
            resolver.resolve(&path)?;
        }
        resolver.memo
    };

    fill(&mut root.value, &memo)?;
    for substitution in &mut root.substitutions {
        substitution.resolved = memo.get(&substitution.path).cloned();
    }
    Ok(())
}

/// A node reached while walking a path
enum Node<'r> {
    Borrowed(&'r HoconValue),
    Shared(Arc<HoconValue>),
}

impl Node<'_> {
    fn get(&self) -> &HoconValue {
        match self {
            Node::Borrowed(node) => node,
            Node::Shared(node) => node,
        }
    }
}

struct Resolver<'r> {
    root: &'r HoconValue,
    max_depth: usize,
    memo: HashMap<String, Arc<HoconValue>>,
    visiting: Vec<String>,
}

impl<'r> Resolver<'r> {
    fn new(root: &'r HoconValue, max_depth: usize) -> Self {
        Self {
            root,
            max_depth,
            memo: HashMap::new(),
            visiting: Vec::new(),
        }
    }

    /// Returns the fully resolved node at `path`
    fn resolve(&mut self, path: &str) -> Result<Arc<HoconValue>, ResolveError> {
        if let Some(value) = self.memo.get(path) {
            return Ok(Arc::clone(value));
        }

        if self.visiting.iter().any(|p| p == path) {
            let mut chain = self.visiting.clone();
            chain.push(path.to_string());
            return Err(ResolveError::Cyclic {
                path: path.to_string(),
                chain: chain.join(" -> "),
            });
        }

        if self.visiting.len() >= self.max_depth {
            return Err(ResolveError::DepthExceeded {
                path: path.to_string(),
                max_depth: self.max_depth,
            });
        }

        self.visiting.push(path.to_string());
        let resolved = self.resolve_target(path);
        self.visiting.pop();
        let resolved = resolved?;

        trace!(path = path, kind = resolved.kind_name(), "resolved substitution");
        self.memo.insert(path.to_string(), Arc::clone(&resolved));
        Ok(resolved)
    }

    fn resolve_target(&mut self, path: &str) -> Result<Arc<HoconValue>, ResolveError> {
        let node = self.lookup(path)?;
        // A plain alias shares its target instead of wrapping it
        if let [HoconElement::Substitution(sub)] = node.get().elements() {
            if !sub.is_resolved() {
                let target = sub.path.clone();
                return self.resolve(&target);
            }
        }
        Ok(Arc::new(self.resolve_node(node.get())?))
    }

    /// Walks `path` from the root, expanding substitutions met on the way
    fn lookup(&mut self, path: &str) -> Result<Node<'r>, ResolveError> {
        let mut current = Node::Borrowed(self.root);

        for segment in path.split('.') {
            let next = match self.expand_head(current)? {
                Node::Borrowed(node) => node.get_child_object(segment).map(Node::Borrowed),
                Node::Shared(node) => node
                    .get_child_object(segment)
                    .map(|child| Node::Shared(Arc::new(child.clone()))),
            };
            current = next.ok_or_else(|| ResolveError::Unresolved {
                path: path.to_string(),
            })?;
        }

        Ok(current)
    }

    /// Replaces a node that starts with a placeholder by its target
    fn expand_head(&mut self, node: Node<'r>) -> Result<Node<'r>, ResolveError> {
        let head = match node.get().elements().first() {
            Some(HoconElement::Substitution(sub)) if !sub.is_resolved() => Some(sub.path.clone()),
            _ => None,
        };
        match head {
            Some(path) => Ok(Node::Shared(self.resolve(&path)?)),
            None => Ok(node),
        }
    }

    /// Copies `node`, pointing its placeholders at their shared targets
    fn resolve_node(&mut self, node: &HoconValue) -> Result<HoconValue, ResolveError> {
        let mut resolved = HoconValue::new();
        for element in node.elements() {
            let element = match element {
                HoconElement::Literal(literal) => HoconElement::Literal(literal.clone()),
                HoconElement::Array(items) => HoconElement::Array(
                    items
                        .iter()
                        .map(|item| self.resolve_node(item))
                        .collect::<Result<_, _>>()?,
                ),
                HoconElement::Object(obj) => {
                    let mut copy = HoconObject::new();
                    for (key, child) in obj.iter() {
                        copy.insert(key.clone(), self.resolve_node(child)?);
                    }
                    HoconElement::Object(copy)
                }
                HoconElement::Substitution(sub) => match &sub.resolved {
                    Some(target) => HoconElement::Substitution(HoconSubstitution {
                        path: sub.path.clone(),
                        resolved: Some(Arc::clone(target)),
                    }),
                    None => HoconElement::Substitution(HoconSubstitution {
                        path: sub.path.clone(),
                        resolved: Some(self.resolve(&sub.path)?),
                    }),
                },
            };
            resolved.append_value(element);
        }
        Ok(resolved)
    }
}

fn contains_substitution(value: &HoconValue) -> bool {
    value.elements().iter().any(|element| match element {
        HoconElement::Substitution(_) => true,
        HoconElement::Array(items) => items.iter().any(contains_substitution),
        HoconElement::Object(obj) => obj.iter().any(|(_, child)| contains_substitution(child)),
        HoconElement::Literal(_) => false,
    })
}

fn collect_paths(value: &HoconValue, paths: &mut Vec<String>) {
    for element in value.elements() {
        match element {
            HoconElement::Substitution(sub) => paths.push(sub.path.clone()),
            HoconElement::Array(items) => {
                for item in items {
                    collect_paths(item, paths);
                }
            }
            HoconElement::Object(obj) => {
                for (_, child) in obj.iter() {
                    collect_paths(child, paths);
                }
            }
            HoconElement::Literal(_) => {}
        }
    }
}

fn fill(
    value: &mut HoconValue,
    memo: &HashMap<String, Arc<HoconValue>>,
) -> Result<(), ResolveError> {
    for element in value.elements_mut() {
        match element {
            HoconElement::Substitution(sub) => {
                let target = memo.get(&sub.path).ok_or_else(|| ResolveError::Unresolved {
                    path: sub.path.clone(),
                })?;
                sub.resolved = Some(Arc::clone(target));
            }
            HoconElement::Array(items) => {
                for item in items {
                    fill(item, memo)?;
                }
            }
            HoconElement::Object(obj) => {
                for child in obj.values_mut() {
                    fill(child, memo)?;
                }
            }
            HoconElement::Literal(_) => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn resolved(input: &str) -> Result<ConfigRoot, ResolveError> {
        let mut root = Parser::new(input).parse().unwrap();
        resolve_substitutions(&mut root, 128)?;
        Ok(root)
    }

    fn node<'v>(root: &'v ConfigRoot, path: &str) -> &'v HoconValue {
        path.split('.')
            .try_fold(&root.value, |node, key| node.get_child_object(key))
            .unwrap_or_else(|| panic!("missing path {}", path))
    }

    #[test]
    fn test_simple_substitution() {
        let root = resolved("a = 42\nb = ${a}").unwrap();
        assert_eq!(node(&root, "b").get_int().unwrap(), 42);
        assert!(root.substitutions.iter().all(HoconSubstitution::is_resolved));
    }

    #[test]
    fn test_forward_reference() {
        let root = resolved("b = ${a.x}\na { x = forward }").unwrap();
        assert_eq!(node(&root, "b").get_string().unwrap(), "forward");
    }

    #[test]
    fn test_string_concatenation_with_substitution() {
        let root = resolved("name = world\ngreeting = hello ${name} again").unwrap();
        assert_eq!(node(&root, "greeting").get_string().unwrap(), "hello world again");
    }

    #[test]
    fn test_path_through_substitution() {
        let root = resolved("base { x = 1 }\nalias = ${base}\nc = ${alias.x}").unwrap();
        assert_eq!(node(&root, "c").get_int().unwrap(), 1);
        assert_eq!(node(&root, "alias.x").get_int().unwrap(), 1);
    }

    #[test]
    fn test_nested_substitutions_resolve() {
        let root = resolved("a = 1\nb = ${a}\nc = ${b}\nlist = [${a}, ${c}]").unwrap();
        assert_eq!(node(&root, "c").get_int().unwrap(), 1);
        assert_eq!(node(&root, "list").get_int_list().unwrap(), vec![1, 1]);
    }

    #[test]
    fn test_unresolved_substitution() {
        assert_eq!(
            resolved("a = ${missing.key}").unwrap_err(),
            ResolveError::Unresolved {
                path: "missing.key".to_string()
            }
        );
    }

    #[test]
    fn test_mutual_cycle() {
        match resolved("a = ${b}\nb = ${a}") {
            Err(ResolveError::Cyclic { path, chain }) => {
                assert_eq!(path, "b");
                assert_eq!(chain, "b -> a -> b");
            }
            other => panic!("Expected Cyclic, got {:?}", other),
        }
    }

    #[test]
    fn test_self_reference_through_object() {
        assert!(matches!(
            resolved("a = { x = ${a} }"),
            Err(ResolveError::Cyclic { .. })
        ));
    }

    #[test]
    fn test_sibling_reference_is_not_a_cycle() {
        let root = resolved("a { x = 1, y = ${b} }\nb = ${a.x}").unwrap();
        assert_eq!(node(&root, "a.y").get_int().unwrap(), 1);
    }

    #[test]
    fn test_document_without_substitutions() {
        let root = resolved("a = 1").unwrap();
        assert!(root.substitutions.is_empty());
    }

    #[test]
    fn test_aliases_share_one_target() {
        let root = resolved("base { x = 1 }
a = ${base}
b = ${base}
c = ${a}").unwrap();
        let target = |path: &str| match node(&root, path).elements() {
            [HoconElement::Substitution(sub)] => sub.resolved.clone().unwrap(),
            other => panic!("Expected a placeholder at {}, got {:?}", path, other),
        };
        assert!(Arc::ptr_eq(&target("a"), &target("b")));
        assert!(Arc::ptr_eq(&target("a"), &target("c")));
    }

    #[test]
    fn test_chain_beyond_max_depth() {
        let mut input = String::new();
        for i in 0..20 {
            input.push_str(&format!("a{} = ${{a{}}}\n", i, i + 1));
        }
        input.push_str("a20 = end\n");

        let mut root = Parser::new(&input).parse().unwrap();
        match resolve_substitutions(&mut root, 8) {
            Err(ResolveError::DepthExceeded { max_depth, .. }) => assert_eq!(max_depth, 8),
            other => panic!("Expected DepthExceeded, got {:?}", other),
        }

        let root = resolved(&input).unwrap();
        assert_eq!(node(&root, "a0").get_string().unwrap(), "end");
    }

    #[test]
    fn test_concatenation_chain_beyond_max_depth() {
        let mut input = String::new();
        for i in 0..500 {
            input.push_str(&format!("a{} = x${{a{}}}\n", i, i + 1));
        }
        input.push_str("a500 = end\n");

        assert!(matches!(
            resolved(&input),
            Err(ResolveError::DepthExceeded { max_depth: 128, .. })
        ));
    }

    #[test]
    fn test_long_chain_declared_in_reverse() {
        // Each link only needs the one resolved before it
        let links = 20_000;
        let mut input = format!("a{} = end\n", links);
        for i in (0..links).rev() {
            input.push_str(&format!("a{} = x${{a{}}}\n", i, i + 1));
        }

        let root = resolved(&input).unwrap();
        assert_eq!(node(&root, &format!("a{}", links - 1)).get_string().unwrap(), "xend");
        drop(root);
    }
}
