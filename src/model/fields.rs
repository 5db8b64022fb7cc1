//! Reference names of the work item fields the chores read and write.

pub const WORK_ITEM_TYPE: &str = "System.WorkItemType";
pub const TITLE: &str = "System.Title";
pub const STATE: &str = "System.State";
pub const DESCRIPTION: &str = "System.Description";
pub const ASSIGNED_TO: &str = "System.AssignedTo";
pub const PARENT: &str = "System.Parent";
pub const AREA_ID: &str = "System.AreaId";
pub const AREA_PATH: &str = "System.AreaPath";
pub const ITERATION_ID: &str = "System.IterationId";
pub const ITERATION_PATH: &str = "System.IterationPath";

pub const BACKLOG_PRIORITY: &str = "Microsoft.VSTS.Common.BacklogPriority";
pub const ACTIVITY: &str = "Microsoft.VSTS.Common.Activity";
pub const REMAINING_WORK: &str = "Microsoft.VSTS.Scheduling.RemainingWork";
pub const EFFORT: &str = "Microsoft.VSTS.Scheduling.Effort";

pub const FINANCIAL_ENTITY: &str = "NetBet.FinancialEntity2";
pub const PRODUCT_PREPARATION_STATE: &str = "NetBet.ProductPreparationState";
pub const TECHNICAL_PREPARATION_STATE: &str = "NetBet.TechnicalPreparationState";
pub const PRODUCT_PREPARATION_ASSIGNED_TO: &str = "NetBet.ProductPreparationAssignedTo";
pub const TECHNICAL_PREPARATION_ASSIGNED_TO: &str = "NetBet.TechnicalPreparationAssignedTo";

pub mod link {
    pub const PARENT: &str = "System.LinkTypes.Hierarchy-Reverse";
    pub const CHILD: &str = "System.LinkTypes.Hierarchy-Forward";
    pub const RELATED: &str = "System.LinkTypes.Related";
    pub const DEPENDENCY_REVERSE: &str = "System.LinkTypes.Dependency-Reverse";
}
