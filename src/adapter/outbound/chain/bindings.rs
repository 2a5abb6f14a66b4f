//! Contract bindings for the keeper's collaborators.

use alloy_sol_types::sol;

sol! {
    #[sol(rpc)]
    contract KeeperHelper {
        error InvalidStateTransition(uint256 positionId, uint8 currentState);

        function getPendingOptions(address collection) external view returns (uint256[] memory);
        function getActiveOptions(address collection) external view returns (uint256[] memory);
        function getExpiredOptions(address collection) external view returns (uint256[] memory);
        function sumPNLWeightedDelta(address collection, uint256[] calldata positionIds)
            external view returns (int256 pnl, int256 weightedDelta);

        function batchActivateOptions(address collection, uint256[] calldata positionIds) external;
        function batchCloseOptions(address collection, uint256[] calldata positionIds) external;
        function batchForceClosePendingPositions(address collection, uint256[] calldata positionIds) external;
    }
}

sol! {
    #[sol(rpc)]
    contract AssetRiskCache {
        function getAssetRisk(address collection) external view returns (int256 delta, int256 pnl);
        function updateCollectionRisk(address collection, int256 delta, int256 pnl) external;
    }
}

sol! {
    #[sol(rpc)]
    contract Vault {
        function updateUnrealizedPNL() external;
    }
}

sol! {
    #[sol(rpc)]
    contract OptionToken {
        function totalSupply() external view returns (uint256);
    }
}
