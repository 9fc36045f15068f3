// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Executor lookup by stage

use super::{
    CompositeSloExecutor, DispatchExecutor, ExecutorConfig, HostSamplingExecutor,
    LogClusterExecutor, SliExecutor, StateExecutor,
};
use cv_adapters::{HostInventory, RecordWriter, TaskDirectory, WorkerDispatch};
use cv_core::StageType;

/// Collaborators the executors call out to
#[derive(Clone)]
pub struct ExecutorDeps<W, D, I, R> {
    pub dispatch: W,
    pub directory: D,
    pub inventory: I,
    pub records: R,
}

/// One executor per stage
pub struct ExecutorSet<W, D, I, R> {
    service_guard_log_cluster: LogClusterExecutor<W, D>,
    service_guard_log_analysis: DispatchExecutor<W, D>,
    service_guard_trend_analysis: DispatchExecutor<W, D>,
    service_guard_time_series: DispatchExecutor<W, D>,
    pre_deployment_log_cluster: LogClusterExecutor<W, D>,
    deployment_log_cluster: LogClusterExecutor<W, D>,
    deployment_log_host_sampling: HostSamplingExecutor<D, I>,
    deployment_log_analysis: DispatchExecutor<W, D>,
    deployment_log_feedback: DispatchExecutor<W, D>,
    deployment_metric_host_sampling: HostSamplingExecutor<D, I>,
    deployment_time_series_analysis: DispatchExecutor<W, D>,
    sli_metric_analysis: SliExecutor<D, R>,
    composite_slo_metric_analysis: CompositeSloExecutor<R>,
}

impl<W, D, I, R> ExecutorSet<W, D, I, R>
where
    W: WorkerDispatch,
    D: TaskDirectory,
    I: HostInventory,
    R: RecordWriter,
{
    pub fn new(deps: ExecutorDeps<W, D, I, R>, config: ExecutorConfig) -> Self {
        let ExecutorDeps {
            dispatch,
            directory,
            inventory,
            records,
        } = deps;
        let single =
            |stage| DispatchExecutor::new(stage, dispatch.clone(), directory.clone(), config);
        let cluster =
            |stage| LogClusterExecutor::new(stage, dispatch.clone(), directory.clone(), config);
        let sampling =
            |stage| HostSamplingExecutor::new(stage, directory.clone(), inventory.clone(), config);

        Self {
            service_guard_log_cluster: cluster(StageType::ServiceGuardLogCluster),
            service_guard_log_analysis: single(StageType::ServiceGuardLogAnalysis),
            service_guard_trend_analysis: single(StageType::ServiceGuardTrendAnalysis),
            service_guard_time_series: single(StageType::ServiceGuardTimeSeries),
            pre_deployment_log_cluster: cluster(StageType::PreDeploymentLogCluster),
            deployment_log_cluster: cluster(StageType::DeploymentLogCluster),
            deployment_log_host_sampling: sampling(StageType::DeploymentLogHostSampling),
            deployment_log_analysis: single(StageType::DeploymentLogAnalysis),
            deployment_log_feedback: single(StageType::DeploymentLogFeedback),
            deployment_metric_host_sampling: sampling(StageType::DeploymentMetricHostSampling),
            deployment_time_series_analysis: single(StageType::DeploymentTimeSeriesAnalysis),
            sli_metric_analysis: SliExecutor::new(directory.clone(), records.clone(), config),
            composite_slo_metric_analysis: CompositeSloExecutor::new(records, config),
        }
    }

    /// Executor that drives `stage`
    pub fn for_stage(&self, stage: StageType) -> &dyn StateExecutor {
        match stage {
            StageType::ServiceGuardLogCluster => &self.service_guard_log_cluster,
            StageType::ServiceGuardLogAnalysis => &self.service_guard_log_analysis,
            StageType::ServiceGuardTrendAnalysis => &self.service_guard_trend_analysis,
            StageType::ServiceGuardTimeSeries => &self.service_guard_time_series,
            StageType::PreDeploymentLogCluster => &self.pre_deployment_log_cluster,
            StageType::DeploymentLogCluster => &self.deployment_log_cluster,
            StageType::DeploymentLogHostSampling => &self.deployment_log_host_sampling,
            StageType::DeploymentLogAnalysis => &self.deployment_log_analysis,
            StageType::DeploymentLogFeedback => &self.deployment_log_feedback,
            StageType::DeploymentMetricHostSampling => &self.deployment_metric_host_sampling,
            StageType::DeploymentTimeSeriesAnalysis => &self.deployment_time_series_analysis,
            StageType::SliMetricAnalysis => &self.sli_metric_analysis,
            StageType::CompositeSloMetricAnalysis => &self.composite_slo_metric_analysis,
        }
    }
}
