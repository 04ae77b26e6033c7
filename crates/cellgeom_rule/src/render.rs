//! Textual renderers over the rule tree.
//!
//! One parsed tree, three emissions: the MCNP cell-card dialect (the only
//! form that is also *parsed*), the FLUKA region syntax, and POV-Ray CSG
//! blocks. The alternate forms are pure rendering concerns; nothing ever
//! parses them back.

use std::fmt::Write;

use crate::node::RuleNode;

/// Renders the MCNP cell-card form: adjacency for intersection, `:` for
/// union, parentheses only where a union sits under an intersection.
#[must_use]
pub fn mcnp(node: &RuleNode) -> String {
    let mut out = String::new();
    write_mcnp(&mut out, node, false);
    out
}

fn write_mcnp(out: &mut String, node: &RuleNode, inside_inter: bool) {
    match node {
        RuleNode::Surf(n) => {
            let _ = write!(out, "{n}");
        }
        RuleNode::Inter(l, r) => {
            write_mcnp(out, l, true);
            out.push(' ');
            write_mcnp(out, r, true);
        }
        RuleNode::Union(l, r) => {
            if inside_inter {
                out.push('(');
            }
            write_mcnp(out, l, false);
            out.push(':');
            write_mcnp(out, r, false);
            if inside_inter {
                out.push(')');
            }
        }
    }
}

/// Renders the FLUKA region form. FLUKA's sign convention is inverted
/// relative to MCNP: `+n` selects the *negative* (inside) half-space, so
/// literal signs flip on emission. Union is `|`, intersection is
/// adjacency.
#[must_use]
pub fn fluka(node: &RuleNode) -> String {
    let mut out = String::new();
    write_fluka(&mut out, node, false);
    out
}

fn write_fluka(out: &mut String, node: &RuleNode, inside_inter: bool) {
    match node {
        RuleNode::Surf(n) => {
            let sign = if *n > 0 { '-' } else { '+' };
            let _ = write!(out, "{sign}s{}", n.abs());
        }
        RuleNode::Inter(l, r) => {
            write_fluka(out, l, true);
            out.push(' ');
            write_fluka(out, r, true);
        }
        RuleNode::Union(l, r) => {
            if inside_inter {
                out.push('(');
            }
            write_fluka(out, l, false);
            out.push_str(" | ");
            write_fluka(out, r, false);
            if inside_inter {
                out.push(')');
            }
        }
    }
}

/// Renders nested POV-Ray CSG blocks. A negated literal becomes an
/// inverted object.
#[must_use]
pub fn povray(node: &RuleNode) -> String {
    let mut out = String::new();
    write_povray(&mut out, node);
    out
}

fn write_povray(out: &mut String, node: &RuleNode) {
    match node {
        RuleNode::Surf(n) => {
            if *n > 0 {
                let _ = write!(out, "object {{ s{n} }}");
            } else {
                let _ = write!(out, "object {{ s{} inverse }}", n.abs());
            }
        }
        RuleNode::Inter(l, r) => {
            out.push_str("intersection { ");
            write_povray(out, l);
            out.push(' ');
            write_povray(out, r);
            out.push_str(" }");
        }
        RuleNode::Union(l, r) => {
            out.push_str("union { ");
            write_povray(out, l);
            out.push(' ');
            write_povray(out, r);
            out.push_str(" }");
        }
    }
}
