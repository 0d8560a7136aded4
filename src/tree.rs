//! The compressed prefix tree backing the router.
//!
//! One `Node` tree exists per HTTP method. Nodes own their children directly;
//! static children are dispatched on their first byte through `indices`,
//! which is kept in descending-priority order so the hottest subtree is
//! probed first. At most one wildcard child (`:param` or `*catch_all`) can
//! descend from a node, and it always sits at the end of `children`.

use crate::route::Params;
use anyhow::{bail, Result};
use std::cmp::min;
use std::mem;
use std::str;

/// The kinds of nodes the tree can hold.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
enum NodeType {
    /// The tree root.
    Root,
    /// A named parameter, e.g. `/:id`.
    Param,
    /// A catch-all parameter, e.g. `/*filepath`.
    CatchAll,
    /// Anything else.
    Static,
}

/// A lookup that found no route. `tsr` reports whether a route exists for the
/// same path with the trailing slash toggled.
#[derive(Debug, Clone, Copy)]
pub(crate) struct NoMatch {
    pub(crate) tsr: bool,
}

impl NoMatch {
    fn tsr(tsr: bool) -> Self {
        Self { tsr }
    }
}

/// A node in the radix tree, ordered by priority.
///
/// Priority is the number of routes registered through this node or its
/// descendants. A node with a non-empty handler chain is a route terminus.
pub(crate) struct Node<H> {
    prefix: Vec<u8>,
    wild_child: bool,
    node_type: NodeType,
    indices: Vec<u8>,
    children: Vec<Node<H>>,
    handlers: Vec<H>,
    priority: u32,
}

impl<H> Default for Node<H> {
    fn default() -> Self {
        Self {
            prefix: Vec::new(),
            wild_child: false,
            node_type: NodeType::Static,
            indices: Vec::new(),
            children: Vec::new(),
            handlers: Vec::new(),
            priority: 0,
        }
    }
}

/// A wildcard alternative skipped in favor of a static child, recorded so the
/// walk can backtrack to it if the static branch dead-ends.
struct Skipped<'n, 'p, H> {
    path: &'p [u8],
    node: &'n Node<H>,
    params: usize,
}

// Wildcard boundaries always fall on ASCII bytes (`/`, `:`, `*`), so slices
// taken at them are valid UTF-8 whenever the registered pattern and the
// request path are.
fn as_str(bytes: &[u8]) -> &str {
    str::from_utf8(bytes).unwrap_or("")
}

impl<H> Node<H> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register a handler chain under the given path pattern.
    ///
    /// Splits existing nodes where the new pattern diverges mid-edge and
    /// bumps `priority` along the traversed path. Pattern conflicts (wildcard
    /// clashes, misplaced catch-alls, duplicate registrations) are returned
    /// as errors and abort the registration.
    pub(crate) fn insert(&mut self, path: &str, handlers: Vec<H>) -> Result<()> {
        check_wildcard_names(path)?;

        let full_path = path;
        let path_bytes = path.as_bytes();
        let mut prefix = path_bytes;

        self.priority += 1;

        // Empty tree
        if self.prefix.is_empty() && self.children.is_empty() {
            self.insert_child(prefix, full_path, handlers)?;
            self.node_type = NodeType::Root;
            return Ok(());
        }

        let mut current = self;

        'walk: loop {
            // Find the longest common prefix. The existing prefix never
            // contains ':' or '*', so neither does the common part.
            let mut i = 0;
            let max = min(prefix.len(), current.prefix.len());

            while i < max && prefix[i] == current.prefix[i] {
                i += 1;
            }

            // Split the edge: the node keeps the common prefix and pushes
            // everything it owned onto a new child holding the remainder.
            if i < current.prefix.len() {
                let mut child = Self {
                    prefix: current.prefix[i..].to_owned(),
                    wild_child: current.wild_child,
                    indices: current.indices.clone(),
                    handlers: mem::take(&mut current.handlers),
                    priority: current.priority - 1,
                    ..Self::default()
                };

                mem::swap(&mut current.children, &mut child.children);

                current.children = vec![child];
                current.indices = current.prefix[i..=i].to_owned();
                current.prefix = prefix[..i].to_owned();
                current.wild_child = false;
            }

            // Descend with the remaining suffix
            if prefix.len() > i {
                prefix = &prefix[i..];

                let idxc = prefix[0];

                // '/' after a param node has exactly one static continuation
                if current.node_type == NodeType::Param
                    && idxc == b'/'
                    && current.children.len() == 1
                {
                    current = &mut current.children[0];
                    current.priority += 1;

                    continue 'walk;
                }

                // Static child with a matching first byte?
                for mut i in 0..current.indices.len() {
                    if idxc == current.indices[i] {
                        i = current.update_child_priority(i);
                        current = &mut current.children[i];

                        continue 'walk;
                    }
                }

                if idxc != b':' && idxc != b'*' && current.node_type != NodeType::CatchAll {
                    current.indices.push(idxc);
                    let child = current.add_child(Self::default());
                    current.update_child_priority(current.indices.len() - 1);
                    current = &mut current.children[child];
                } else if current.wild_child {
                    // The suffix starts with a wildcard; it must be the same
                    // wildcard that already exists here.
                    current = match current.children.last_mut() {
                        Some(wild) => wild,
                        None => bail!("invalid node: wildcard flag without wildcard child"),
                    };
                    current.priority += 1;

                    if prefix.len() >= current.prefix.len()
                        && current.prefix == prefix[..current.prefix.len()]
                        // A catch-all can never have further children
                        && current.node_type != NodeType::CatchAll
                        // Reject longer names, e.g. ':name' vs ':names'
                        && (current.prefix.len() >= prefix.len()
                            || prefix[current.prefix.len()] == b'/')
                    {
                        continue 'walk;
                    }

                    bail!(
                        "'{}' in new path '{}' conflicts with existing wildcard '{}'",
                        as_str(prefix),
                        full_path,
                        as_str(&current.prefix),
                    );
                }

                return current.insert_child(prefix, full_path, handlers);
            }

            // The whole pattern was consumed: this node is the terminus
            if !current.handlers.is_empty() {
                bail!("a handler chain is already registered for path '{full_path}'");
            }

            current.handlers = handlers;

            return Ok(());
        }
    }

    // Add a child node, keeping the wildcard child at the end.
    fn add_child(&mut self, child: Node<H>) -> usize {
        let len = self.children.len();

        if self.wild_child && len > 0 {
            self.children.insert(len - 1, child);
            len - 1
        } else {
            self.children.push(child);
            len
        }
    }

    // Increments the priority of the given child and reorders the siblings
    // if necessary, returning the child's new position.
    fn update_child_priority(&mut self, pos: usize) -> usize {
        self.children[pos].priority += 1;
        let priority = self.children[pos].priority;

        let mut new_pos = pos;
        while new_pos > 0 && self.children[new_pos - 1].priority < priority {
            self.children.swap(new_pos - 1, new_pos);
            new_pos -= 1;
        }

        // Keep `indices` in lock-step with `children`
        if new_pos != pos {
            self.indices = [
                &self.indices[..new_pos],
                &self.indices[pos..=pos],
                &self.indices[new_pos..pos],
                &self.indices[pos + 1..],
            ]
            .concat();
        }

        new_pos
    }

    fn insert_child(&mut self, mut prefix: &[u8], full_path: &str, handlers: Vec<H>) -> Result<()> {
        let mut current = self;

        loop {
            let (wildcard, wildcard_index, valid) = find_wildcard(prefix);

            let (wildcard, mut wildcard_index) = match (wildcard, wildcard_index) {
                (Some(w), Some(i)) => (w, i),
                // No more wildcards: the rest is a static terminus
                _ => {
                    current.handlers = handlers;
                    current.prefix = prefix.to_owned();
                    return Ok(());
                }
            };

            if !valid {
                bail!(
                    "only one wildcard per path segment is allowed, has: '{}' in path '{}'",
                    as_str(wildcard),
                    full_path,
                );
            }

            if wildcard.len() < 2 {
                bail!("wildcards must be named with a non-empty name in path '{full_path}'");
            }

            if wildcard[0] == b':' {
                // Static text before the wildcard becomes this node's prefix
                if wildcard_index > 0 {
                    current.prefix = prefix[..wildcard_index].to_owned();
                    prefix = &prefix[wildcard_index..];
                }

                let child = Self {
                    node_type: NodeType::Param,
                    prefix: wildcard.to_owned(),
                    ..Self::default()
                };

                let child = current.add_child(child);
                current.wild_child = true;
                current = &mut current.children[child];
                current.priority += 1;

                // If the pattern continues past the param there is another
                // static subpath starting with '/'
                if wildcard.len() < prefix.len() {
                    prefix = &prefix[wildcard.len()..];
                    let child = Self {
                        priority: 1,
                        ..Self::default()
                    };

                    let child = current.add_child(child);
                    current = &mut current.children[child];
                    continue;
                }

                current.handlers = handlers;
                return Ok(());
            }

            // Catch-all: must own the rest of the pattern
            if wildcard_index + wildcard.len() != prefix.len() {
                bail!("catch-all routes are only allowed at the end of the path in path '{full_path}'");
            }

            if !current.prefix.is_empty() && current.prefix.last().copied() == Some(b'/') {
                bail!(
                    "catch-all wildcard in path '{full_path}' conflicts with the existing handler chain for the path segment root",
                );
            }

            // The byte before '*' must be a '/'
            wildcard_index = match wildcard_index.checked_sub(1) {
                Some(i) => i,
                None => bail!("catch-all wildcard must follow a '/' in path '{full_path}'"),
            };

            if prefix[wildcard_index] != b'/' {
                bail!("no '/' before catch-all in path '{full_path}'");
            }

            current.prefix = prefix[..wildcard_index].to_owned();
            current.indices = vec![b'/'];

            // First node: an empty-prefix head that dispatches to the value node
            let child = Self {
                wild_child: true,
                node_type: NodeType::CatchAll,
                ..Self::default()
            };

            let child = current.add_child(child);
            current = &mut current.children[child];
            current.priority += 1;

            // Second node: the node actually holding the variable and handlers
            let child = Self {
                prefix: prefix[wildcard_index..].to_owned(),
                node_type: NodeType::CatchAll,
                handlers,
                priority: 1,
                ..Self::default()
            };

            current.children = vec![child];

            return Ok(());
        }
    }

    /// Walk the tree with a concrete request path.
    ///
    /// Returns the registered handler chain and the parameters bound along
    /// the way, or a `NoMatch` whose `tsr` flag reports whether toggling the
    /// trailing slash would reach a terminus. Static children are preferred
    /// over a wildcard sibling; the walk backtracks to the skipped wildcard
    /// if the static branch dead-ends.
    pub(crate) fn get_value<'n, 'p>(
        &'n self,
        path: &'p str,
    ) -> Result<(&'n [H], Params<'n, 'p>), NoMatch> {
        let full_path = path.as_bytes();

        let mut current = self;
        let mut path = full_path;
        let mut backtracking = false;
        let mut params = Params::new();
        let mut skipped_nodes: Vec<Skipped<'_, '_, H>> = Vec::new();

        'walk: loop {
            let prefix = &current.prefix;
            if path.len() > prefix.len() {
                if prefix[..] == path[..prefix.len()] {
                    path = &path[prefix.len()..];

                    let idxc = path[0];

                    // Dispatch on the next byte, unless we arrived here by
                    // backtracking (the static branch already failed).
                    if !backtracking {
                        if let Some(i) = current.indices.iter().position(|&c| c == idxc) {
                            if current.wild_child {
                                skipped_nodes.push(Skipped {
                                    path: &full_path
                                        [full_path.len() - (prefix.len() + path.len())..],
                                    node: current,
                                    params: params.len(),
                                });
                            }
                            current = &current.children[i];
                            continue 'walk;
                        }
                    }

                    if path != b"/" && !current.wild_child {
                        while let Some(skipped) = skipped_nodes.pop() {
                            if skipped.path.ends_with(path) {
                                path = skipped.path;
                                current = skipped.node;
                                params.truncate(skipped.params);

                                backtracking = true;
                                continue 'walk;
                            }
                        }
                    }

                    if !current.wild_child {
                        // Nothing found; recommend stripping the extra
                        // trailing slash if that reaches a terminus.
                        let tsr = path == b"/" && !current.handlers.is_empty();
                        return Err(NoMatch::tsr(tsr));
                    }

                    // The wildcard child is always the last child
                    current = match current.children.last() {
                        Some(wild) => wild,
                        None => return Err(NoMatch::tsr(false)),
                    };

                    match current.node_type {
                        NodeType::Param => {
                            // Consume up to the next '/' or the path end
                            let end = path.iter().position(|&c| c == b'/').unwrap_or(path.len());

                            params.push(as_str(&current.prefix[1..]), as_str(&path[..end]));

                            if end < path.len() {
                                if current.children.is_empty() {
                                    let tsr = path.len() == end + 1;
                                    return Err(NoMatch::tsr(tsr));
                                }

                                path = &path[end..];
                                current = &current.children[0];

                                backtracking = false;
                                continue 'walk;
                            }

                            if !current.handlers.is_empty() {
                                return Ok((&current.handlers, params));
                            } else if current.children.len() == 1 {
                                current = &current.children[0];

                                let tsr = (current.prefix == b"/"
                                    && !current.handlers.is_empty())
                                    || (current.prefix.is_empty() && current.indices == b"/");
                                return Err(NoMatch::tsr(tsr));
                            }

                            return Err(NoMatch::tsr(false));
                        }
                        NodeType::CatchAll => {
                            // The remainder starts with '/'; bind it without
                            // the leading slash, except for the bare
                            // directory index which binds as "/".
                            let value = if path.len() > 1 { &path[1..] } else { path };
                            params.push(as_str(&current.prefix[2..]), as_str(value));

                            return match current.handlers.is_empty() {
                                false => Ok((&current.handlers, params)),
                                true => Err(NoMatch::tsr(false)),
                            };
                        }
                        _ => return Err(NoMatch::tsr(false)),
                    }
                }
            }

            if path == &prefix[..] {
                // Before reporting a miss on a handler-less node, try any
                // wildcard alternative recorded on the way down.
                if current.handlers.is_empty() && path != b"/" {
                    while let Some(skipped) = skipped_nodes.pop() {
                        if skipped.path.ends_with(path) {
                            path = skipped.path;
                            current = skipped.node;
                            params.truncate(skipped.params);

                            backtracking = true;
                            continue 'walk;
                        }
                    }
                }

                if !current.handlers.is_empty() {
                    return Ok((&current.handlers, params));
                }

                // A wildcard child means a route exists with an additional
                // trailing slash
                if path == b"/" && current.wild_child && current.node_type != NodeType::Root {
                    return Err(NoMatch::tsr(true));
                }

                if !backtracking {
                    if let Some(i) = current.indices.iter().position(|&c| c == b'/') {
                        let child = &current.children[i];
                        let tsr = (child.prefix.len() == 1 && !child.handlers.is_empty())
                            || (child.node_type == NodeType::CatchAll
                                && child
                                    .children
                                    .first()
                                    .map(|c| !c.handlers.is_empty())
                                    .unwrap_or(false));
                        return Err(NoMatch::tsr(tsr));
                    }
                }

                return Err(NoMatch::tsr(false));
            }

            if path != b"/" {
                while let Some(skipped) = skipped_nodes.pop() {
                    if skipped.path.ends_with(path) {
                        path = skipped.path;
                        current = skipped.node;
                        params.truncate(skipped.params);

                        backtracking = true;
                        continue 'walk;
                    }
                }
            }

            // Nothing found; recommend adding a trailing slash if a terminus
            // exists for the extended path. The root itself never gets one.
            let tsr = (path == b"/" && current.node_type != NodeType::Root)
                || (prefix.len() == path.len() + 1
                    && prefix[path.len()] == b'/'
                    && path[..] == prefix[..path.len()]
                    && !current.handlers.is_empty());
            return Err(NoMatch::tsr(tsr));
        }
    }

    /// Case-insensitive variant of the descent, accumulating the case stored
    /// in the tree. Returns the corrected path when a terminus is reached;
    /// `fix_trailing_slash` additionally allows toggling a trailing slash.
    pub(crate) fn find_case_insensitive_path(
        &self,
        path: &str,
        fix_trailing_slash: bool,
    ) -> Option<String> {
        let mut corrected = Vec::with_capacity(path.len() + 1);
        let found = self.case_insensitive_helper(
            path.as_bytes(),
            &mut corrected,
            [0; 4],
            fix_trailing_slash,
        );
        if found {
            String::from_utf8(corrected).ok()
        } else {
            None
        }
    }

    fn case_insensitive_helper(
        &self,
        mut path: &[u8],
        corrected: &mut Vec<u8>,
        mut buf: [u8; 4],
        fix_trailing_slash: bool,
    ) -> bool {
        let lower_path: &[u8] = &path.to_ascii_lowercase();
        if lower_path.len() >= self.prefix.len()
            && (self.prefix.is_empty()
                || lower_path[1..self.prefix.len()].eq_ignore_ascii_case(&self.prefix[1..]))
        {
            corrected.extend_from_slice(&self.prefix);

            path = &path[self.prefix.len()..];

            if !path.is_empty() {
                let cached_lower_path = <&[u8]>::clone(&lower_path);

                // Without a wildcard child we can dispatch on the next child
                // byte and keep walking down.
                if !self.wild_child {
                    // Skip bytes of the current char already consumed
                    buf = shift_n_bytes(buf, self.prefix.len());

                    if buf[0] == 0 {
                        // Process a new char
                        let mut current_char = 0 as char;

                        // Find the char start; chars are up to 4 bytes long
                        let mut off = 0;
                        for j in 0..min(self.prefix.len(), 3) {
                            let i = self.prefix.len() - j;
                            if char_start(cached_lower_path[i]) {
                                current_char = str::from_utf8(&cached_lower_path[i..])
                                    .ok()
                                    .and_then(|s| s.chars().next())
                                    .unwrap_or('\0');
                                off = j;
                                break;
                            }
                        }

                        current_char.encode_utf8(&mut buf);
                        buf = shift_n_bytes(buf, off);

                        for i in 0..self.indices.len() {
                            // Lowercase match: both cases of the byte may
                            // exist as an index, so recurse rather than
                            // committing to this child.
                            if self.indices[i] == buf[0] {
                                if self.children[i].case_insensitive_helper(
                                    path,
                                    corrected,
                                    buf,
                                    fix_trailing_slash,
                                ) {
                                    return true;
                                }

                                if corrected.len() > self.children[i].prefix.len() {
                                    let prev_len = corrected.len() - self.children[i].prefix.len();
                                    corrected.truncate(prev_len);
                                }

                                break;
                            }
                        }

                        // Same for the uppercase char, if it differs
                        let up = current_char.to_ascii_uppercase();
                        if up != current_char {
                            up.encode_utf8(&mut buf);
                            buf = shift_n_bytes(buf, off);

                            for i in 0..self.indices.len() {
                                if self.indices[i] == buf[0] {
                                    return self.children[i].case_insensitive_helper(
                                        path,
                                        corrected,
                                        buf,
                                        fix_trailing_slash,
                                    );
                                }
                            }
                        }
                    } else {
                        // A multi-byte char is still being consumed
                        for i in 0..self.indices.len() {
                            if self.indices[i] == buf[0] {
                                return self.children[i].case_insensitive_helper(
                                    path,
                                    corrected,
                                    buf,
                                    fix_trailing_slash,
                                );
                            }
                        }
                    }

                    // Nothing found; recommend stripping the trailing slash
                    // if that reaches a terminus.
                    return fix_trailing_slash && path == [b'/'] && !self.handlers.is_empty();
                }

                return match self.children.last() {
                    Some(wild) => wild.case_insensitive_match_helper(
                        path,
                        corrected,
                        buf,
                        fix_trailing_slash,
                    ),
                    None => false,
                };
            } else {
                if !self.handlers.is_empty() {
                    return true;
                }

                // No terminus here; try the path with a trailing slash added
                if fix_trailing_slash {
                    for i in 0..self.indices.len() {
                        if self.indices[i] == b'/' {
                            let child = &self.children[i];
                            if (child.prefix.len() == 1 && !child.handlers.is_empty())
                                || (child.node_type == NodeType::CatchAll
                                    && child
                                        .children
                                        .first()
                                        .map(|c| !c.handlers.is_empty())
                                        .unwrap_or(false))
                            {
                                corrected.push(b'/');
                                return true;
                            }
                            return false;
                        }
                    }
                }
                return false;
            }
        }

        // Nothing found; try the path with the trailing slash toggled
        if fix_trailing_slash {
            if path == [b'/'] {
                return true;
            }
            if lower_path.len() + 1 == self.prefix.len()
                && self.prefix[lower_path.len()] == b'/'
                && lower_path[1..].eq_ignore_ascii_case(&self.prefix[1..lower_path.len()])
                && !self.handlers.is_empty()
            {
                corrected.extend_from_slice(&self.prefix);
                return true;
            }
        }

        false
    }

    // Continues the case-insensitive walk through a wildcard node.
    fn case_insensitive_match_helper(
        &self,
        mut path: &[u8],
        corrected: &mut Vec<u8>,
        buf: [u8; 4],
        fix_trailing_slash: bool,
    ) -> bool {
        match self.node_type {
            NodeType::Param => {
                let mut end = 0;

                while end < path.len() && path[end] != b'/' {
                    end += 1;
                }

                // The matched value keeps its original case
                corrected.extend_from_slice(&path[..end]);

                if end < path.len() {
                    if !self.children.is_empty() {
                        path = &path[end..];

                        return self.children[0].case_insensitive_helper(
                            path,
                            corrected,
                            buf,
                            fix_trailing_slash,
                        );
                    }

                    if fix_trailing_slash && path.len() == end + 1 {
                        return true;
                    }
                    return false;
                }

                if !self.handlers.is_empty() {
                    return true;
                } else if fix_trailing_slash
                    && self.children.len() == 1
                    && self.children[0].prefix == [b'/']
                    && !self.children[0].handlers.is_empty()
                {
                    corrected.push(b'/');
                    return true;
                }

                false
            }
            NodeType::CatchAll => {
                corrected.extend_from_slice(path);
                true
            }
            _ => false,
        }
    }
}

// Shift the char buffer left by n bytes.
const fn shift_n_bytes(bytes: [u8; 4], n: usize) -> [u8; 4] {
    match u32::from_ne_bytes(bytes).overflowing_shr((n * 8) as u32) {
        (_, true) => [0; 4],
        (shifted, false) => shifted.to_ne_bytes(),
    }
}

// Whether the byte could be the first byte of an encoded char; continuation
// bytes always have their top two bits set to 10.
const fn char_start(b: u8) -> bool {
    b & 0xC0 != 0x80
}

// Search for a wildcard segment and check the name for invalid characters.
// Returns (wildcard, position, valid).
fn find_wildcard(path: &[u8]) -> (Option<&[u8]>, Option<usize>, bool) {
    for (start, &c) in path.iter().enumerate() {
        // A wildcard starts with ':' (param) or '*' (catch-all)
        if c != b':' && c != b'*' {
            continue;
        }

        // Find the end and reject further ':' or '*' within the segment
        let mut valid = true;

        for (end, &c) in path[start + 1..].iter().enumerate() {
            match c {
                b'/' => return (Some(&path[start..start + 1 + end]), Some(start), valid),
                b':' | b'*' => valid = false,
                _ => (),
            }
        }
        return (Some(&path[start..]), Some(start), valid);
    }
    (None, None, false)
}

// Reject patterns that bind the same wildcard name twice; by-name access
// would silently shadow the second binding.
fn check_wildcard_names(path: &str) -> Result<()> {
    let bytes = path.as_bytes();
    let mut names: Vec<&str> = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b':' || bytes[i] == b'*' {
            let start = i + 1;
            let mut end = start;
            while end < bytes.len() && bytes[end] != b'/' {
                end += 1;
            }
            let name = &path[start..end];
            if !name.is_empty() {
                if names.contains(&name) {
                    bail!("duplicate wildcard name '{name}' in path '{path}'");
                }
                names.push(name);
            }
            i = end;
        } else {
            i += 1;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(routes: &[&'static str]) -> Node<&'static str> {
        let mut root = Node::new();
        for route in routes {
            root.insert(route, vec![*route]).unwrap();
        }
        root
    }

    fn assert_match(
        root: &Node<&'static str>,
        path: &str,
        route: &str,
        params: &[(&str, &str)],
    ) {
        let (handlers, matched) = root
            .get_value(path)
            .unwrap_or_else(|_| panic!("expected '{path}' to match '{route}'"));
        assert_eq!(handlers, &[route], "handlers for '{path}'");
        let got: Vec<(&str, &str)> = matched.iter().map(|p| (p.name, p.value)).collect();
        assert_eq!(got, params, "params for '{path}'");
    }

    fn assert_no_match(root: &Node<&'static str>, path: &str, want_tsr: bool) {
        match root.get_value(path) {
            Ok(_) => panic!("expected no match for '{path}'"),
            Err(no_match) => assert_eq!(no_match.tsr, want_tsr, "tsr for '{path}'"),
        }
    }

    #[test]
    fn test_static_routes() {
        let root = tree(&[
            "/",
            "/cmd",
            "/contact",
            "/co",
            "/c",
            "/a",
            "/ab",
            "/doc/",
            "/doc/go_faq.html",
            "/doc/go1.html",
            "/α",
            "/β",
        ]);

        for path in ["/", "/cmd", "/contact", "/co", "/c", "/a", "/ab", "/α", "/β"] {
            assert_match(&root, path, path, &[]);
        }
        assert_match(&root, "/doc/go_faq.html", "/doc/go_faq.html", &[]);
        assert_no_match(&root, "/con", false);
        assert_no_match(&root, "/cona", false);
        assert_no_match(&root, "/no", false);
    }

    #[test]
    fn test_param_routes() {
        let root = tree(&[
            "/",
            "/cmd/:tool/:sub",
            "/cmd/:tool/",
            "/src/*filepath",
            "/search/",
            "/search/:query",
            "/user_:name",
            "/user_:name/about",
            "/files/:dir/*filepath",
            "/info/:user/public",
            "/info/:user/project/:project",
        ]);

        assert_match(&root, "/cmd/test/", "/cmd/:tool/", &[("tool", "test")]);
        assert_match(
            &root,
            "/cmd/test/3",
            "/cmd/:tool/:sub",
            &[("tool", "test"), ("sub", "3")],
        );
        assert_match(
            &root,
            "/src/some/file.png",
            "/src/*filepath",
            &[("filepath", "some/file.png")],
        );
        assert_match(
            &root,
            "/search/someth!ng+in+ünìcodé",
            "/search/:query",
            &[("query", "someth!ng+in+ünìcodé")],
        );
        assert_match(&root, "/user_gopher", "/user_:name", &[("name", "gopher")]);
        assert_match(
            &root,
            "/user_gopher/about",
            "/user_:name/about",
            &[("name", "gopher")],
        );
        assert_match(
            &root,
            "/files/js/inc/framework.js",
            "/files/:dir/*filepath",
            &[("dir", "js"), ("filepath", "inc/framework.js")],
        );
        assert_match(
            &root,
            "/info/gordon/project/go",
            "/info/:user/project/:project",
            &[("user", "gordon"), ("project", "go")],
        );

        assert_no_match(&root, "/cmd/test", true);
        assert_no_match(&root, "/search/someth!ng+in+ünìcodé/", true);
    }

    #[test]
    fn test_static_preferred_over_wildcard() {
        // Registration order must not matter
        for routes in [
            &["/users/new", "/users/:id"],
            &["/users/:id", "/users/new"],
        ] {
            let root = tree(routes);
            assert_match(&root, "/users/new", "/users/new", &[]);
            assert_match(&root, "/users/42", "/users/:id", &[("id", "42")]);
        }
    }

    #[test]
    fn test_backtrack_to_wildcard() {
        // '/users/newer' walks into the '/users/new' branch before falling
        // back to the param sibling
        let root = tree(&["/users/new", "/users/:id", "/users/:id/posts"]);
        assert_match(&root, "/users/newer", "/users/:id", &[("id", "newer")]);
        assert_match(
            &root,
            "/users/newer/posts",
            "/users/:id/posts",
            &[("id", "newer")],
        );
    }

    #[test]
    fn test_catch_all_greediness() {
        let root = tree(&["/files/*filepath"]);

        assert_match(
            &root,
            "/files/a/b/c",
            "/files/*filepath",
            &[("filepath", "a/b/c")],
        );
        assert_match(&root, "/files/", "/files/*filepath", &[("filepath", "/")]);
        // No trailing slash never matches a catch-all, but a redirect helps
        match root.get_value("/files") {
            Ok(_) => panic!("'/files' must not match the catch-all"),
            Err(no_match) => assert!(no_match.tsr),
        }
    }

    #[test]
    fn test_trailing_slash_recommendations() {
        let root = tree(&[
            "/hi",
            "/b/",
            "/search/:query",
            "/cmd/:tool/",
            "/src/*filepath",
            "/x",
            "/x/y",
            "/y/",
            "/y/z",
            "/aa",
            "/a/",
            "/admin",
            "/admin/:category",
            "/admin/:category/:page",
            "/doc",
            "/doc/go_faq.html",
            "/doc/go1.html",
            "/no/a",
            "/no/b",
        ]);

        for path in [
            "/hi/", "/b", "/search/gopher/", "/cmd/vet", "/src", "/x/", "/y", "/aa/", "/a",
            "/admin/", "/admin/config/", "/admin/config/permissions/", "/doc/",
        ] {
            assert_no_match(&root, path, true);
        }

        for path in ["/", "/no", "/no/", "/_", "/_/", "/api/world/abc"] {
            assert_no_match(&root, path, false);
        }
    }

    #[test]
    fn test_root_trailing_slash_never_redirects() {
        // An unsplit root holds the whole pattern as its prefix; looking up
        // '/' lands in the not-found branch and must not recommend a slash.
        let root = tree(&["/hello"]);
        assert_no_match(&root, "/", false);

        // Deeper nodes still earn the recommendation
        let root = tree(&["/x", "/x/y"]);
        assert_no_match(&root, "/x/", true);
    }

    #[test]
    fn test_conflicts_are_errors() {
        let mut root: Node<&str> = Node::new();
        root.insert("/cmd/:tool/:sub", vec!["h"]).unwrap();
        root.insert("/src/*filepath", vec!["h"]).unwrap();
        root.insert("/user_:name", vec!["h"]).unwrap();

        // Wildcard vs wildcard with a different name
        assert!(root.insert("/cmd/:badvar/:sub", vec!["h"]).is_err());
        // Wildcard vs existing catch-all
        assert!(root.insert("/src/:file", vec!["h"]).is_err());
        assert!(root.insert("/src/static.json", vec!["h"]).is_err());
        // Duplicate registration
        assert!(root.insert("/user_:name", vec!["h"]).is_err());
        // Catch-all not in final position
        assert!(root.insert("/src2/*filepath/x", vec!["h"]).is_err());
        // Unnamed wildcards
        assert!(root.insert("/unnamed/:", vec!["h"]).is_err());
        assert!(root.insert("/unnamed2/*", vec!["h"]).is_err());
        // Two wildcards in one segment
        assert!(root.insert("/mixed/:a:b", vec!["h"]).is_err());
    }

    #[test]
    fn test_duplicate_wildcard_names_rejected() {
        let mut root: Node<&str> = Node::new();
        let err = root
            .insert("/posts/:id/comments/:id", vec!["h"])
            .unwrap_err();
        assert!(err.to_string().contains("duplicate wildcard name"));

        let mut root: Node<&str> = Node::new();
        assert!(root.insert("/posts/:id/files/*id", vec!["h"]).is_err());
    }

    #[test]
    fn test_handler_chain_order_preserved() {
        let mut root: Node<u32> = Node::new();
        root.insert("/chain", vec![1, 2, 3]).unwrap();

        let (handlers, _) = root.get_value("/chain").unwrap();
        assert_eq!(handlers, &[1, 2, 3]);
    }

    #[test]
    fn test_find_case_insensitive_path() {
        let root = tree(&[
            "/hi",
            "/b/",
            "/ABC/",
            "/search/:query",
            "/cmd/:tool/",
            "/src/*filepath",
            "/x",
            "/x/y",
            "/y/",
            "/y/z",
            "/doc",
            "/doc/go_faq.html",
            "/doc/go1.html",
        ]);

        // Exact-case inputs come back unchanged, with or without fixing
        for fix in [true, false] {
            for path in ["/hi", "/b/", "/ABC/", "/doc", "/doc/go_faq.html"] {
                assert_eq!(
                    root.find_case_insensitive_path(path, fix).as_deref(),
                    Some(path),
                );
            }
        }

        assert_eq!(
            root.find_case_insensitive_path("/HI", false).as_deref(),
            Some("/hi"),
        );
        assert_eq!(
            root.find_case_insensitive_path("/abc/", false).as_deref(),
            Some("/ABC/"),
        );
        assert_eq!(
            root.find_case_insensitive_path("/DOC/GO_FAQ.HTML", false)
                .as_deref(),
            Some("/doc/go_faq.html"),
        );

        // Trailing-slash fixes only apply when requested
        assert_eq!(
            root.find_case_insensitive_path("/HI/", true).as_deref(),
            Some("/hi"),
        );
        assert_eq!(root.find_case_insensitive_path("/HI/", false), None);
        assert_eq!(
            root.find_case_insensitive_path("/B", true).as_deref(),
            Some("/b/"),
        );
        assert_eq!(root.find_case_insensitive_path("/B", false), None);

        // Params keep the case of the request path
        assert_eq!(
            root.find_case_insensitive_path("/SEARCH/QueryString", false)
                .as_deref(),
            Some("/search/QueryString"),
        );

        assert_eq!(root.find_case_insensitive_path("/missing", true), None);
    }

    #[test]
    fn test_priority_reorders_siblings() {
        // The busier subtree must be probed first: 'indices' stays in
        // lock-step with the reordered children.
        let root = tree(&[
            "/a/one",
            "/b/one",
            "/b/two",
            "/b/three",
            "/b/four",
            "/a/two",
        ]);

        assert_match(&root, "/a/one", "/a/one", &[]);
        assert_match(&root, "/a/two", "/a/two", &[]);
        assert_match(&root, "/b/three", "/b/three", &[]);
        assert_match(&root, "/b/four", "/b/four", &[]);
    }
}
