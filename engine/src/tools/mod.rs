pub mod knowledge;
pub mod planner;
pub mod sandbox;

pub use knowledge::KnowledgeBase;
pub use planner::StudyPlanner;
pub use sandbox::CodeSandbox;

/// Wire name recorded when the sandbox runs a code block
pub const EXECUTE_CODE: &str = "execute_code";

/// Wire name recorded when the knowledge base is consulted
pub const SEARCH_KNOWLEDGE_BASE: &str = "search_knowledge_base";

/// Wire name recorded when a study plan is generated
pub const CREATE_STUDY_PLAN: &str = "create_study_plan";

/// Bundle of the three built-in tools handed to the dispatch graph.
///
/// Every tool is stateless and pure with respect to the graph: faults come
/// back as formatted strings (or a typed error the branch converts to one)
/// so a branch can embed them into its response instead of failing the
/// request.
pub struct ToolSet {
    pub sandbox: CodeSandbox,
    pub knowledge: KnowledgeBase,
    pub planner: StudyPlanner,
}

impl ToolSet {
    pub fn new() -> Self {
        Self {
            sandbox: CodeSandbox::new(),
            knowledge: KnowledgeBase::new(),
            planner: StudyPlanner::new(),
        }
    }

    /// Names of all available tools, for the system info report.
    pub fn tool_names() -> [&'static str; 3] {
        [EXECUTE_CODE, SEARCH_KNOWLEDGE_BASE, CREATE_STUDY_PLAN]
    }
}

impl Default for ToolSet {
    fn default() -> Self {
        Self::new()
    }
}
