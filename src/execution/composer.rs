// src/execution/composer.rs

use crate::error::{PoolError, PoolResult};
use crate::rpc::LedgerClient;
use solana_sdk::{
    hash::Hash,
    instruction::Instruction,
    message::{VersionedMessage, v0},
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
    transaction::VersionedTransaction,
};
use tracing::{debug, info};

/// Accumule des instructions, dans l'ordre d'ajout, pour les soumettre en une
/// seule transaction atomique : le réseau applique tout ou rien.
#[derive(Debug, Clone)]
pub struct TransactionComposer {
    payer: Pubkey,
    instructions: Vec<Instruction>,
}

impl TransactionComposer {
    pub fn new(payer: Pubkey) -> Self {
        Self { payer, instructions: Vec::new() }
    }

    pub fn add(&mut self, instruction: Instruction) -> &mut Self {
        self.instructions.push(instruction);
        self
    }

    pub fn extend(&mut self, instructions: impl IntoIterator<Item = Instruction>) -> &mut Self {
        self.instructions.extend(instructions);
        self
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Compile un message V0 (sans LUT) et le signe.
    /// Il faut fournir exactement les signataires requis par les instructions.
    pub fn build(&self, signers: &[&Keypair], recent_blockhash: Hash) -> PoolResult<VersionedTransaction> {
        if self.instructions.is_empty() {
            return Err(PoolError::EmptyTransaction);
        }

        // Un même keypair peut être passé deux fois (ex: trader = payer).
        let mut unique_signers: Vec<&Keypair> = Vec::with_capacity(signers.len());
        for &signer in signers {
            if !unique_signers.iter().any(|s| s.pubkey() == signer.pubkey()) {
                unique_signers.push(signer);
            }
        }

        let message = v0::Message::try_compile(&self.payer, &self.instructions, &[], recent_blockhash)
            .map_err(|e| PoolError::InstructionBuild(e.to_string()))?;

        VersionedTransaction::try_new(VersionedMessage::V0(message), unique_signers.as_slice())
            .map_err(|e| PoolError::Signing(e.to_string()))
    }

    /// Signe, envoie et attend la confirmation. Pas de ré-essai : un échec
    /// remonte directement à l'appelant.
    pub async fn submit(&self, client: &dyn LedgerClient, signers: &[&Keypair]) -> PoolResult<Signature> {
        let recent_blockhash = client.get_latest_blockhash().await?;
        let transaction = self.build(signers, recent_blockhash)?;

        debug!(
            payer = %self.payer,
            instructions = self.instructions.len(),
            signers = transaction.signatures.len(),
            "Envoi de la transaction..."
        );

        let signature = client.send_and_confirm_transaction(&transaction).await?;
        info!(signature = %signature, instructions = self.instructions.len(), "Transaction confirmée");
        Ok(signature)
    }
}
