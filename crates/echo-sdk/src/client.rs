//! EchoClient - connection facade

use echo_crypto::{CryptoProvider, Secp256k1Provider};
use echo_primitives::{AccountId, AssetAmount, AssetId, ChainId, ObjectId};
use echo_types::operations::TransferOperation;
use echo_types::{DynamicGlobalProperties, Operation, Transaction, TxBuilder, TypesError};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::rpc::operations::{
    AccessApi, AccountObject, BroadcastTransactionWithCallback, CancelAllSubscriptions,
    GetAccountByName, GetBlock, GetChainId, GetDynamicGlobalProperties, GetFullAccounts,
    GetObjects, GetRequiredFees, Login, LookupAccountNames, SetSubscribeCallback,
};
use crate::rpc::{Dispatcher, Notice};
use crate::session::Session;
use crate::subscription::{AccountEvent, Deliveries, SubscriptionId, Topic};
use crate::transport::{InboundHandler, Transport};
use crate::{ClientConfig, SdkError, Wallet};

#[cfg(feature = "ws")]
use crate::transport::WsTransport;

/// Echo client over a single shared socket.
///
/// Calls, subscriptions and broadcasts are multiplexed onto one transport.
/// Subscription state lives in a [`Session`] that is replaced whenever the
/// socket closes; callers re-subscribe after reconnecting.
pub struct EchoClient {
    config: ClientConfig,
    dispatcher: Dispatcher,
    session: Mutex<Session>,
    provider: Arc<dyn CryptoProvider>,
}

impl EchoClient {
    /// Connect over WebSocket, start the socket task and initialize the APIs
    #[cfg(feature = "ws")]
    pub async fn connect(config: ClientConfig) -> Result<Arc<Self>, SdkError> {
        config.validate()?;
        let (transport, driver) = WsTransport::connect(&config.url).await?;
        let client = Arc::new(Self::new(
            config,
            Arc::new(transport),
            Arc::new(Secp256k1Provider),
        )?);
        driver.spawn(client.clone());
        client.init_apis().await?;
        Ok(client)
    }

    /// Create a client over a custom transport and crypto provider.
    ///
    /// Inbound frames must be fed to [`InboundHandler::on_message`].
    pub fn new(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        provider: Arc<dyn CryptoProvider>,
    ) -> Result<Self, SdkError> {
        config.validate()?;
        let dispatcher = Dispatcher::new(transport, config.call_timeout());
        Ok(Self {
            config,
            dispatcher,
            session: Mutex::new(Session::default()),
            provider,
        })
    }

    /// Create a client over a custom transport with the built-in secp256k1 provider
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Result<Self, SdkError> {
        Self::new(config, transport, Arc::new(Secp256k1Provider))
    }

    /// Active configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Underlying dispatcher, for raw socket operations
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    // ==================== Lifecycle ====================

    /// Log in and access every configured API
    pub async fn init_apis(&self) -> Result<(), SdkError> {
        let accepted = self
            .dispatcher
            .call(Login {
                user: self.config.login_user.clone(),
                password: self.config.login_password.clone(),
            })
            .await?;
        if !accepted {
            return Err(SdkError::LoginFailed);
        }

        for &api in &self.config.apis {
            let id = self.dispatcher.call(AccessApi { api }).await?;
            self.dispatcher.register_api(api, id);
            debug!(api = api.name(), id, "api accessed");
        }
        info!(apis = self.config.apis.len(), "apis initialized");
        Ok(())
    }

    fn route_notice(&self, notice: Notice) -> Deliveries {
        let mut session = self.session.lock();
        if session.subscribe_callback_id == Some(notice.callback_id) {
            let mut deliveries = session.accounts.route(&notice.payload);
            deliveries.extend(session.blocks.route(&notice.payload));
            deliveries.extend(session.blockchain_data.route(&notice.payload));
            deliveries
        } else {
            session.transactions.route(notice.callback_id, notice.payload)
        }
    }

    // ==================== Chain Queries ====================

    /// Chain id, fetched once per connection
    pub async fn chain_id(&self) -> Result<ChainId, SdkError> {
        let cached = self.session.lock().chain_id;
        if let Some(chain_id) = cached {
            return Ok(chain_id);
        }
        let chain_id = self.dispatcher.call(GetChainId).await?;
        self.session.lock().chain_id = Some(chain_id);
        Ok(chain_id)
    }

    /// Current head state
    pub async fn dynamic_global_properties(&self) -> Result<DynamicGlobalProperties, SdkError> {
        self.dispatcher.call(GetDynamicGlobalProperties).await
    }

    /// Fetch objects by id; unknown ids yield `null`
    pub async fn get_objects(&self, ids: &[ObjectId]) -> Result<Vec<Value>, SdkError> {
        self.dispatcher.call(GetObjects { ids: ids.to_vec() }).await
    }

    /// Get a block by number
    pub async fn get_block(&self, number: u64) -> Result<Option<Value>, SdkError> {
        self.dispatcher.call(GetBlock { number }).await
    }

    // ==================== Account Queries ====================

    /// Look up an account by name, caching its id
    pub async fn get_account_by_name(&self, name: &str) -> Result<Option<AccountObject>, SdkError> {
        let account = self
            .dispatcher
            .call(GetAccountByName {
                name: name.to_string(),
            })
            .await?;
        if let Some(account) = &account {
            self.session.lock().accounts.cache_name(account.name.clone(), account.id);
        }
        Ok(account)
    }

    /// Full account state for names or ids, without subscribing
    pub async fn get_full_accounts(&self, names_or_ids: &[String]) -> Result<Vec<(String, Value)>, SdkError> {
        self.dispatcher
            .call(GetFullAccounts {
                names_or_ids: names_or_ids.to_vec(),
                subscribe: false,
            })
            .await
    }

    /// Look up several accounts by name, caching the ids found
    pub async fn lookup_account_names(&self, names: &[String]) -> Result<Vec<Option<AccountObject>>, SdkError> {
        let accounts = self
            .dispatcher
            .call(LookupAccountNames {
                names: names.to_vec(),
            })
            .await?;
        let mut session = self.session.lock();
        for account in accounts.iter().flatten() {
            session.accounts.cache_name(account.name.clone(), account.id);
        }
        Ok(accounts)
    }

    /// Fees for `operations` in `asset`, in order
    pub async fn required_fees(&self, operations: &[Operation], asset: AssetId) -> Result<Vec<AssetAmount>, SdkError> {
        self.dispatcher
            .call(GetRequiredFees {
                operations: operations.to_vec(),
                asset,
            })
            .await
    }

    /// Resolve an account id (`1.2.x`) or name to its id
    async fn resolve_account(&self, name_or_id: &str) -> Result<AccountId, SdkError> {
        if ObjectId::is_object_id(name_or_id) {
            let id: ObjectId = name_or_id.parse()?;
            if !id.is_account() {
                return Err(SdkError::MalformedInput(format!("{id} is not an account id")));
            }
            return Ok(id);
        }

        let cached = self.session.lock().accounts.resolve_name(name_or_id);
        if let Some(id) = cached {
            return Ok(id);
        }
        match self.get_account_by_name(name_or_id).await? {
            Some(account) => Ok(account.id),
            None => Err(SdkError::MalformedInput(format!("unknown account {name_or_id}"))),
        }
    }

    // ==================== Subscriptions ====================

    /// Claim the subscribe callback id if none is installed yet. Runs under
    /// the same lock as the registration it belongs to.
    fn claim_subscribe_callback(&self, session: &mut Session) -> Option<u64> {
        if session.subscribe_callback_id.is_some() {
            return None;
        }
        let callback_id = self.dispatcher.next_call_id();
        session.subscribe_callback_id = Some(callback_id);
        Some(callback_id)
    }

    async fn install_subscribe_callback(&self, claimed: Option<u64>) -> Result<(), SdkError> {
        if let Some(callback_id) = claimed {
            self.dispatcher
                .call(SetSubscribeCallback {
                    callback_id,
                    clear_filter: true,
                })
                .await?;
            info!(callback_id, "subscribe callback installed");
        }
        Ok(())
    }

    async fn release_subscribe_callback(&self, released: Option<u64>) -> Result<(), SdkError> {
        if let Some(callback_id) = released {
            self.dispatcher.call(CancelAllSubscriptions).await?;
            info!(callback_id, "all subscriptions cancelled");
        }
        Ok(())
    }

    fn unregister_locked(session: &mut Session, id: SubscriptionId) -> bool {
        match id.topic() {
            Topic::Account => session.accounts.unregister(id),
            Topic::Block => session.blocks.unregister(id),
            Topic::BlockchainData => session.blockchain_data.unregister(id),
        }
    }

    /// Undo a registration whose node-side setup failed
    fn roll_back(&self, id: SubscriptionId, claimed: Option<u64>) {
        let mut session = self.session.lock();
        Self::unregister_locked(&mut session, id);
        if claimed.is_some() && session.subscribe_callback_id == claimed {
            session.subscribe_callback_id = None;
        }
    }

    /// Install the subscribe callback if needed, then ask the node to watch
    /// the objects via `watch`
    async fn activate<F>(&self, id: SubscriptionId, claimed: Option<u64>, watch: F) -> Result<SubscriptionId, SdkError>
    where
        F: std::future::Future<Output = Result<(), SdkError>>,
    {
        let result = async {
            self.install_subscribe_callback(claimed).await?;
            watch.await
        }
        .await;
        match result {
            Ok(()) => Ok(id),
            Err(e) => {
                warn!(error = %e, "subscription setup failed, rolling back");
                self.roll_back(id, claimed);
                Err(e)
            }
        }
    }

    /// Subscribe to updates of an account given by name or id
    pub async fn subscribe_account<F>(&self, name_or_id: &str, listener: F) -> Result<SubscriptionId, SdkError>
    where
        F: Fn(&AccountEvent) + Send + Sync + 'static,
    {
        let account = self.resolve_account(name_or_id).await?;
        let (id, claimed) = {
            let mut session = self.session.lock();
            let id = session.accounts.register(account, listener);
            (id, self.claim_subscribe_callback(&mut session))
        };
        let watch = async {
            self.dispatcher
                .call(GetFullAccounts {
                    names_or_ids: vec![account.to_string()],
                    subscribe: true,
                })
                .await
                .map(|_| ())
        };
        self.activate(id, claimed, watch).await
    }

    /// Subscribe to new head blocks
    pub async fn subscribe_blocks<F>(&self, listener: F) -> Result<SubscriptionId, SdkError>
    where
        F: Fn(&DynamicGlobalProperties) + Send + Sync + 'static,
    {
        let (id, claimed) = {
            let mut session = self.session.lock();
            let id = session.blocks.register(listener);
            (id, self.claim_subscribe_callback(&mut session))
        };
        self.activate(id, claimed, self.watch_head()).await
    }

    /// Subscribe to every object update batch of each applied block
    pub async fn subscribe_blockchain_data<F>(&self, listener: F) -> Result<SubscriptionId, SdkError>
    where
        F: Fn(&[Value]) + Send + Sync + 'static,
    {
        let (id, claimed) = {
            let mut session = self.session.lock();
            let id = session.blockchain_data.register(listener);
            (id, self.claim_subscribe_callback(&mut session))
        };
        self.activate(id, claimed, self.watch_head()).await
    }

    async fn watch_head(&self) -> Result<(), SdkError> {
        self.get_objects(&[ObjectId::DYNAMIC_GLOBAL_PROPERTIES])
            .await
            .map(|_| ())
    }

    /// Remove one subscription. Removing the last listener cancels every
    /// node-side subscription. Returns whether the subscription existed.
    pub async fn unsubscribe(&self, id: SubscriptionId) -> Result<bool, SdkError> {
        let (removed, released) = {
            let mut session = self.session.lock();
            let removed = Self::unregister_locked(&mut session, id);
            let released = if removed && !session.has_object_listeners() {
                session.subscribe_callback_id.take()
            } else {
                None
            };
            (removed, released)
        };
        self.release_subscribe_callback(released).await?;
        Ok(removed)
    }

    /// Remove every listener of an account. Returns how many were removed.
    pub async fn unsubscribe_account(&self, name_or_id: &str) -> Result<usize, SdkError> {
        let account = self.resolve_account(name_or_id).await?;
        let (removed, released) = {
            let mut session = self.session.lock();
            let removed = session.accounts.unregister_account(&account);
            let released = if removed > 0 && !session.has_object_listeners() {
                session.subscribe_callback_id.take()
            } else {
                None
            };
            (removed, released)
        };
        self.release_subscribe_callback(released).await?;
        Ok(removed)
    }

    // ==================== Transactions ====================

    /// Assemble a transaction: reference block from the current head, the
    /// chain id, and fees quoted in the configured fee asset
    pub async fn prepare_transaction(&self, operations: Vec<Operation>) -> Result<Transaction, SdkError> {
        if operations.is_empty() {
            return Err(TypesError::EmptyOperations.into());
        }
        let fee_asset = self.config.fee_asset_id()?;
        let props = self.dynamic_global_properties().await?;
        let chain_id = self.chain_id().await?;
        let fees = self.required_fees(&operations, fee_asset).await?;

        let builder = operations.into_iter().fold(
            TxBuilder::new()
                .chain_id(chain_id)
                .head(props)
                .expiration_window(self.config.expiration_window_secs)
                .fees(fees),
            |builder, op| builder.operation(op),
        );
        Ok(builder.build()?)
    }

    /// Sign and broadcast; `listener` receives the confirmation notice.
    ///
    /// Returns the callback id once the node accepted the broadcast.
    pub async fn broadcast<F>(&self, tx: &Transaction, listener: F) -> Result<u64, SdkError>
    where
        F: FnOnce(Result<Value, SdkError>) + Send + 'static,
    {
        let tx_id = tx.id()?;
        let signed = tx.sign(self.provider.as_ref())?;
        let callback_id = self.dispatcher.next_call_id();

        // registered first; the confirmation may race the call response
        self.session.lock().transactions.register(callback_id, listener);
        let call = self
            .dispatcher
            .call(BroadcastTransactionWithCallback {
                callback_id,
                transaction: signed,
            })
            .await;
        if let Err(e) = call {
            self.session.lock().transactions.unregister(callback_id);
            warn!(callback_id, %tx_id, error = %e, "broadcast failed");
            return Err(e);
        }
        info!(callback_id, %tx_id, "transaction broadcast");
        Ok(callback_id)
    }

    /// Broadcast and wait for the confirmation, bounded by the call timeout
    pub async fn broadcast_and_wait(&self, tx: &Transaction) -> Result<Value, SdkError> {
        let (sender, receiver) = oneshot::channel();
        let callback_id = self
            .broadcast(tx, move |outcome| {
                let _ = sender.send(outcome);
            })
            .await?;

        let timeout = self.dispatcher.call_timeout();
        match tokio::time::timeout(timeout, receiver).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_)) => Err(SdkError::Disconnected),
            Err(_) => {
                self.session.lock().transactions.unregister(callback_id);
                let ms = timeout.as_millis() as u64;
                warn!(callback_id, timeout_ms = ms, "no confirmation in time");
                Err(SdkError::Timeout(ms))
            }
        }
    }

    /// Transfer `amount` from `from` to `to`, signed by `wallet`, and wait
    /// for the confirmation
    pub async fn transfer(
        &self,
        wallet: &Wallet,
        from: AccountId,
        to: AccountId,
        amount: AssetAmount,
    ) -> Result<Value, SdkError> {
        let mut tx = self
            .prepare_transaction(vec![TransferOperation::new(from, to, amount).into()])
            .await?;
        tx.add_signing_key(wallet.signing_key());
        self.broadcast_and_wait(&tx).await
    }
}

impl InboundHandler for EchoClient {
    fn on_open(&self) {
        debug!(url = %self.config.url, "socket open");
    }

    fn on_message(&self, text: &str) {
        if let Some(notice) = self.dispatcher.handle_message(text) {
            let callback_id = notice.callback_id;
            let fired = self.route_notice(notice).fire();
            debug!(callback_id, fired, "notice routed");
        }
    }

    fn on_close(&self, reason: &str) {
        self.dispatcher.handle_close(reason);
        let stale = std::mem::take(&mut *self.session.lock());
        let mut transactions = stale.transactions;
        let failed = transactions.fail_all().fire();
        info!(reason, failed, "session dropped");
    }
}

impl std::fmt::Debug for EchoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EchoClient")
            .field("url", &self.config.url)
            .field("pending", &self.dispatcher.pending_count())
            .finish_non_exhaustive()
    }
}
