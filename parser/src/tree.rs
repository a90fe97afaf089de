//! Command tree: the compiled grammar of a root model and every subcommand.
//!
//! Nodes live in an arena owned by [`CommandTree`]. A node refers to its
//! children through the [`SubcommandSlot`] and to its parent through a plain
//! [`NodeId`], which is only used to assemble usage paths.

use indexmap::IndexMap;
use tracing::debug;

use argmodel_core::{
    ConfigError, FieldDescriptor, FieldKind, ModelDescription, ModelSchema, describe, introspect,
};

/// Index of a node inside its [`CommandTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Selector tokens of a union field, each leading to a child node.
#[derive(Debug, Clone)]
pub struct SubcommandSlot {
    /// Declared name of the union field
    pub field: String,
    /// Help text of the union field
    pub help_text: String,
    /// Selector token → child node, in member declaration order
    pub choices: IndexMap<String, NodeId>,
}

impl SubcommandSlot {
    pub fn tokens(&self) -> Vec<&str> {
        self.choices.keys().map(String::as_str).collect()
    }
}

/// How a `-`/`--` token addressed an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spelling {
    /// `--name` or `-x`
    Positive,
    /// `--no-name` or `-no-x` (flags only)
    Negated,
}

/// Compiled grammar of one model.
#[derive(Debug, Clone)]
pub struct CommandNode {
    /// Declared model name
    pub model: String,
    /// Token that selects this node from its parent; `None` for the root
    pub token: Option<String>,
    /// Model summary documentation
    pub summary: String,
    /// Positional fields in declaration order
    pub positionals: Vec<FieldDescriptor>,
    /// Keyword and flag fields keyed by `cli_name`, in declaration order
    pub options: IndexMap<String, FieldDescriptor>,
    pub subcommand: Option<SubcommandSlot>,
    pub parent: Option<NodeId>,
    field_order: Vec<String>,
}

impl CommandNode {
    fn from_description(
        description: ModelDescription,
        token: Option<String>,
        parent: Option<NodeId>,
    ) -> Self {
        let field_order = description.fields.iter().map(|f| f.name.clone()).collect();
        let mut positionals = Vec::new();
        let mut options = IndexMap::new();

        for field in description.fields {
            match field.kind {
                FieldKind::Positional => positionals.push(field),
                FieldKind::Keyword | FieldKind::Flag => {
                    options.insert(field.cli_name.clone(), field);
                }
                FieldKind::Subcommand => {}
            }
        }

        Self {
            model: description.name,
            token,
            summary: description.summary,
            positionals,
            options,
            subcommand: None,
            parent,
            field_order,
        }
    }

    /// Declared field names in declaration order.
    pub fn field_names(&self) -> &[String] {
        &self.field_order
    }

    /// Looks up the option addressed by `token`, accepting `--name`,
    /// `--no-name`, `-x` and `-no-x` spellings.
    pub fn find_option(&self, token: &str) -> Option<(&FieldDescriptor, Spelling)> {
        if let Some(field) = self.options.get(token) {
            return Some((field, Spelling::Positive));
        }
        self.options.values().find_map(|field| {
            if field.short.as_deref() == Some(token) {
                Some((field, Spelling::Positive))
            } else if field.negated_name().as_deref() == Some(token)
                || field.negated_short().as_deref() == Some(token)
            {
                Some((field, Spelling::Negated))
            } else {
                None
            }
        })
    }

    /// Every spelling accepted by this node's options, plus `--help`.
    pub fn option_spellings(&self) -> Vec<String> {
        let mut spellings = Vec::new();
        for field in self.options.values() {
            spellings.push(field.cli_name.clone());
            spellings.extend(field.negated_name());
            spellings.extend(field.short.clone());
            spellings.extend(field.negated_short());
        }
        spellings.push("--help".to_string());
        spellings
    }
}

/// The root command node and all descendant subcommand nodes.
///
/// Built once from a root [`ModelSchema`] and immutable afterwards.
///
/// # Examples
///
/// ```
/// use argmodel_core::*;
/// use argmodel_parser::CommandTree;
///
/// let model = ModelSchema::new("Git").with_field(FieldSchema::subcommand(
///     "sub_command",
///     vec![
///         ModelSchema::new("Merge").with_field(FieldSchema::new("branch", ValueType::Text)),
///         ModelSchema::new("Remote"),
///     ],
/// ));
///
/// let tree = CommandTree::build("git", &model).unwrap();
/// let merge = tree.find(&["merge"]).unwrap();
/// assert_eq!(tree.command_line(merge), "git merge");
/// assert_eq!(tree.node(merge).positionals[0].name, "branch");
/// assert_eq!(tree.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct CommandTree {
    program: String,
    nodes: Vec<CommandNode>,
}

impl CommandTree {
    /// Validates `model` and compiles it into a tree.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] in the model or its union members.
    pub fn build(program: &str, model: &ModelSchema) -> Result<Self, ConfigError> {
        let description = introspect(model)?;
        let mut tree = Self {
            program: program.to_string(),
            nodes: Vec::new(),
        };
        tree.add_node(description, None, None);
        debug!(program, nodes = tree.nodes.len(), "built command tree");
        Ok(tree)
    }

    fn add_node(
        &mut self,
        description: ModelDescription,
        token: Option<String>,
        parent: Option<NodeId>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        let slot_field = description.subcommand().cloned();
        self.nodes
            .push(CommandNode::from_description(description, token, parent));

        if let Some(field) = slot_field {
            let mut choices = IndexMap::new();
            for member in field.members() {
                let child = describe(member);
                let token = child.token.clone();
                let child_id = self.add_node(child, Some(token.clone()), Some(id));
                choices.insert(token, child_id);
            }
            debug!(
                model = %self.nodes[id.0].model,
                subcommands = choices.len(),
                "attached subcommand slot"
            );
            self.nodes[id.0].subcommand = Some(SubcommandSlot {
                field: field.name,
                help_text: field.help_text,
                choices,
            });
        }

        id
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &CommandNode {
        &self.nodes[id.0]
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Selector tokens leading from the root to `id`.
    pub fn path(&self, id: NodeId) -> Vec<String> {
        let mut path = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node(node_id);
            if let Some(token) = &node.token {
                path.push(token.clone());
            }
            current = node.parent;
        }
        path.reverse();
        path
    }

    /// Program name followed by the selector path, as typed by a user.
    pub fn command_line(&self, id: NodeId) -> String {
        std::iter::once(self.program.clone())
            .chain(self.path(id))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Resolves a selector path from the root.
    pub fn find<S: AsRef<str>>(&self, path: &[S]) -> Option<NodeId> {
        let mut current = self.root();
        for token in path {
            let slot = self.node(current).subcommand.as_ref()?;
            current = *slot.choices.get(token.as_ref())?;
        }
        Some(current)
    }
}
