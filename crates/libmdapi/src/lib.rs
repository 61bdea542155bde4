//! Extraction of structured API records from markdown reference documentation.
//!
//! A page is parsed into a [`ProseNode`] tree, split into one [`HeadingEntry`] per heading,
//! annotated, nested into a [`HierarchizedEntry`] forest and finally built into JSON-backed
//! [`Section`] records. [`Extractor`] runs the whole flow; the individual stages are public so
//! that callers with their own markdown parser can drive them directly.

mod entry;
mod error;
mod extractor;
mod heading;
mod hierarchy;
mod highlight;
mod keywords;
mod node;
mod params;
pub mod parse;
pub mod queries;
mod section;
mod signature;

pub use crate::{
    entry::{HeadingEntry, Stability, api_from_source, group_entries},
    error::{ApiDocError, Result},
    extractor::{DEFAULT_BASE_URL, DEFAULT_PREFIX, Document, Extractor},
    heading::{HeadingData, HeadingKind, Slugger, callee, class_parts, classify, slugify},
    hierarchy::{HierarchizedEntry, build_hierarchy},
    highlight::highlight_json,
    keywords::{TYPED_LIST_STARTERS, builtin_types, starts_typed_list},
    node::{
        Code, Heading, Link, LinkReference, LinkStyle, List, Literal, Parent, Position, ProseNode,
        stringify,
    },
    params::ParameterTree,
    section::{RESERVED_KEYS, Section, SectionBuilder, SectionKind, promote_misc_children},
    signature::{
        Param, ParamDoc, Signature, TypeRef, display_name, parse_list, parse_list_item,
        parse_signature,
    },
};
