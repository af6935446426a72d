use super::{expressions::Expr, statements::Statement};

/// Root of a parsed program.
///
/// Every probe shares the same map namespace, so a map assigned in one probe
/// can be read by any other.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub probes: Vec<Probe>,
}

impl Program {
    pub fn new(probes: Vec<Probe>) -> Self {
        Program { probes }
    }
}

/// A single probe: `kind:attach_point /predicate/ { statements }`
#[derive(Debug, Clone, PartialEq)]
pub struct Probe {
    /// Probe type, e.g. `kprobe`
    pub kind: String,
    /// What the probe attaches to, e.g. `sys_read`
    pub attach_point: String,
    pub pred: Option<Predicate>,
    pub stmts: Vec<Statement>,
}

impl Probe {
    pub fn new(kind: &str, attach_point: &str, pred: Option<Predicate>, stmts: Vec<Statement>) -> Self {
        Probe {
            kind: kind.to_string(),
            attach_point: attach_point.to_string(),
            pred,
            stmts,
        }
    }

    /// `kind:attach_point`, or just `kind` when there is no attach point.
    pub fn name(&self) -> String {
        if self.attach_point.is_empty() {
            self.kind.clone()
        } else {
            format!("{}:{}", self.kind, self.attach_point)
        }
    }
}

/// Guard expression deciding whether the probe's statements run.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub expr: Expr,
}

impl Predicate {
    pub fn new(expr: Expr) -> Self {
        Predicate { expr }
    }
}
